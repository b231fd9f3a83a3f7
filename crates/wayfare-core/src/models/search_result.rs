//! Extracted listing model definitions.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::SearchStatus;

/// Persisted listing extracted from a results page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Unique identifier for the row
    pub id: u64,

    /// Activity the listing was found for
    pub activity_id: u64,

    /// URL of the results page the listing was read from
    pub source_url: String,

    /// Human name of the site, e.g. "Booking.com"
    pub website_name: String,

    /// Name of the property
    pub property_name: String,

    /// Displayed price in whole currency units, when one could be parsed
    pub price: Option<i64>,

    /// Review score, when one could be parsed
    pub rating: Option<f64>,

    /// Link to the property page
    pub booking_url: String,

    /// Row status
    pub status: SearchStatus,

    /// Timestamp when the row was stored (UTC)
    pub created_at: Timestamp,
}

/// A listing ready to be stored, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSearchResult {
    pub source_url: String,
    pub website_name: String,
    pub property_name: String,
    pub price: Option<i64>,
    pub rating: Option<f64>,
    pub booking_url: String,
    pub status: SearchStatus,
}
