//! Status enumerations for executions, results and activities.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a workflow execution.
///
/// Executions move `Pending → Running → {Completed | Failed}`. The two
/// terminal states are sticky: the store refuses any update once a row has
/// reached one of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Created, not yet picked up by a worker
    #[default]
    Pending,

    /// A worker is executing the steps
    Running,

    /// All steps and the extraction phase succeeded
    Completed,

    /// The run stopped on an error
    Failed,
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(ExecutionStatus::Pending),
            "RUNNING" => Ok(ExecutionStatus::Running),
            "COMPLETED" => Ok(ExecutionStatus::Completed),
            "FAILED" => Ok(ExecutionStatus::Failed),
            _ => Err(format!("Invalid execution status: {s}")),
        }
    }
}

impl ExecutionStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "PENDING",
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Completed => "COMPLETED",
            ExecutionStatus::Failed => "FAILED",
        }
    }

    /// Whether no further transition is allowed from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use wayfare_core::models::ExecutionStatus;
    ///
    /// assert_eq!(ExecutionStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(ExecutionStatus::Failed.with_icon(), "✗ Failed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "○ Pending",
            ExecutionStatus::Running => "➤ Running",
            ExecutionStatus::Completed => "✓ Completed",
            ExecutionStatus::Failed => "✗ Failed",
        }
    }
}

/// Status of an extracted search result row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl FromStr for SearchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(SearchStatus::Pending),
            "COMPLETED" => Ok(SearchStatus::Completed),
            "FAILED" => Ok(SearchStatus::Failed),
            _ => Err(format!("Invalid search status: {s}")),
        }
    }
}

impl SearchStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Pending => "PENDING",
            SearchStatus::Completed => "COMPLETED",
            SearchStatus::Failed => "FAILED",
        }
    }
}

/// Kind of booking an activity represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    /// Hotels, apartments and other stays
    #[default]
    Accommodation,

    /// Tours, tickets and things to do
    Experience,
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACCOMMODATION" => Ok(ActivityType::Accommodation),
            "EXPERIENCE" => Ok(ActivityType::Experience),
            _ => Err(format!("Invalid activity type: {s}")),
        }
    }
}

impl ActivityType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Accommodation => "ACCOMMODATION",
            ActivityType::Experience => "EXPERIENCE",
        }
    }
}
