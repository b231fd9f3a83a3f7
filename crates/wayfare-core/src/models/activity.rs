//! Activity model definition.

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

use super::ActivityType;

/// Persisted record of one booking intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier for the activity
    pub id: u64,

    /// Free-text query the search was derived from
    pub query: String,

    /// Kind of booking searched for
    pub activity_type: ActivityType,

    /// Destination typed into the search box
    pub location: String,

    /// Check-in date
    pub start_date: Date,

    /// Check-out date
    pub end_date: Date,

    /// Number of adult guests
    pub adult_count: u32,

    /// Number of child guests
    pub child_count: u32,

    /// Whether the traveller accepts nearby dates
    #[serde(default)]
    pub date_flexible: bool,

    /// Timestamp when the activity was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last successful run for this activity (UTC)
    pub updated_at: Timestamp,
}

impl Activity {
    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        self.start_date
            .until(self.end_date)
            .map(|span| i64::from(span.get_days()))
            .unwrap_or(0)
    }
}
