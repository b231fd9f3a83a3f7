//! Parameter structures shared by the CLI and the MCP server.
//!
//! These types carry caller input in its raw form (dates as text, optional
//! guest counts) and convert into the engine's validated types. Interface
//! layers wrap them with their own derives:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schema derives are only compiled with the `schema` feature.

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    models::{ActivityType, RunFilter, SearchRequest},
};

/// Generic parameters for operations requiring just an ID.
///
/// Used for execution status, activity results and cancellation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for starting a search.
///
/// ```rust
/// use wayfare_core::{models::SearchRequest, params::CreateSearch};
///
/// let request = SearchRequest::try_from(CreateSearch {
///     location: "Lisbon".to_string(),
///     start_date: "2025-07-14".to_string(),
///     end_date: "2025-07-18".to_string(),
///     ..Default::default()
/// })
/// .unwrap();
/// assert_eq!(request.adult_count, 1);
/// assert_eq!(request.child_count, 0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateSearch {
    /// The traveller's original free-text query, kept for reference
    #[serde(default)]
    pub query: Option<String>,
    /// Destination to search, e.g. "Lisbon"
    pub location: String,
    /// Check-in date, YYYY-MM-DD
    pub start_date: String,
    /// Check-out date, YYYY-MM-DD
    pub end_date: String,
    /// Number of adults (defaults to 1)
    #[serde(default)]
    pub adults: Option<u32>,
    /// Number of children (defaults to 0)
    #[serde(default)]
    pub children: Option<u32>,
}

/// Parameters for listing runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListRuns {
    /// Which runs to show: all (default), successful, failed or running
    #[serde(default)]
    pub status: RunFilter,
}

fn parse_date(field: &str, value: &str) -> Result<Date> {
    value.trim().parse::<Date>().map_err(|e| {
        EngineError::invalid_input(field).with_reason(format!("'{value}' is not a YYYY-MM-DD date: {e}"))
    })
}

impl TryFrom<CreateSearch> for SearchRequest {
    type Error = EngineError;

    fn try_from(params: CreateSearch) -> Result<Self> {
        let request = SearchRequest {
            start_date: parse_date("start_date", &params.start_date)?,
            end_date: parse_date("end_date", &params.end_date)?,
            query: params
                .query
                .unwrap_or_else(|| format!("Stay in {}", params.location.trim())),
            location: params.location.trim().to_string(),
            adult_count: params.adults.unwrap_or(1),
            child_count: params.children.unwrap_or(0),
            activity_type: ActivityType::Accommodation,
        };
        request.validate()?;
        Ok(request)
    }
}
