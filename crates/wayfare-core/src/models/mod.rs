//! Data models for activities, executions and extracted results.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so the data structures stay free of
//! presentation logic.
//!
//! # Examples
//!
//! ```rust
//! use wayfare_core::models::{ExecutionStatus, WorkflowExecution};
//! use jiff::Timestamp;
//!
//! let execution = WorkflowExecution {
//!     id: 1,
//!     activity_id: 1,
//!     status: ExecutionStatus::Running,
//!     total_steps: 9,
//!     steps_completed: 3,
//!     current_step: Some("Open Date Picker".to_string()),
//! #   created_at: Timestamp::now(),
//! #   started_at: None,
//! #   completed_at: None,
//! #   error_message: None,
//! };
//! assert!((execution.progress() - 1.0 / 3.0).abs() < f64::EPSILON);
//! ```

pub mod activity;
pub mod execution;
pub mod report;
pub mod request;
pub mod runs;
pub mod search_result;
pub mod status;

#[cfg(test)]
mod tests;

pub use activity::Activity;
pub use execution::{INITIAL_STEP_LABEL, WorkflowExecution};
pub use report::{ActivityResults, ExecutionReport};
pub use request::SearchRequest;
pub use runs::{RunCounts, RunFilter, RunListing, RunsReport};
pub use search_result::{NewSearchResult, SearchResult};
pub use status::{ActivityType, ExecutionStatus, SearchStatus};
