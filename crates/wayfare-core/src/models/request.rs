//! Structured search request.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ActivityType;
use crate::error::{EngineError, Result};

/// Structured search produced from a traveller's query.
///
/// Built once, either from caller parameters (see
/// [`crate::params::CreateSearch`]) or by an external query parser, and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    /// Original free-text query
    pub query: String,
    /// Destination to search
    pub location: String,
    /// Check-in date
    pub start_date: Date,
    /// Check-out date
    pub end_date: Date,
    /// Number of adults (at least one)
    pub adult_count: u32,
    /// Number of children
    pub child_count: u32,
    /// Kind of booking searched for
    #[serde(default)]
    pub activity_type: ActivityType,
}

impl SearchRequest {
    /// Checks the request before any record is created for it.
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(EngineError::invalid_input("location").with_reason("must not be empty"));
        }
        if self.end_date <= self.start_date {
            return Err(EngineError::invalid_input("end_date")
                .with_reason(format!("must be after the start date {}", self.start_date)));
        }
        if self.adult_count == 0 {
            return Err(
                EngineError::invalid_input("adults").with_reason("at least one adult is required")
            );
        }
        Ok(())
    }
}
