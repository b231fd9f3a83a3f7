//! Read models for the runs listing.

use std::str::FromStr;

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ExecutionStatus;

/// Which executions a runs listing shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum RunFilter {
    /// Every execution, whatever its state
    #[default]
    All,
    /// COMPLETED executions
    Successful,
    /// FAILED executions
    Failed,
    /// RUNNING executions
    Running,
}

impl RunFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunFilter::All => "all",
            RunFilter::Successful => "successful",
            RunFilter::Failed => "failed",
            RunFilter::Running => "running",
        }
    }

    /// The execution status this filter selects, `None` for all of them.
    pub fn status(&self) -> Option<ExecutionStatus> {
        match self {
            RunFilter::All => None,
            RunFilter::Successful => Some(ExecutionStatus::Completed),
            RunFilter::Failed => Some(ExecutionStatus::Failed),
            RunFilter::Running => Some(ExecutionStatus::Running),
        }
    }
}

impl FromStr for RunFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(RunFilter::All),
            "successful" | "completed" => Ok(RunFilter::Successful),
            "failed" => Ok(RunFilter::Failed),
            "running" => Ok(RunFilter::Running),
            _ => Err(format!(
                "Invalid run filter: {s} (expected all, successful, failed or running)"
            )),
        }
    }
}

/// Number of executions per filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RunCounts {
    pub all: usize,
    pub successful: usize,
    pub failed: usize,
    pub running: usize,
}

impl RunCounts {
    pub fn get(&self, filter: RunFilter) -> usize {
        match filter {
            RunFilter::All => self.all,
            RunFilter::Successful => self.successful,
            RunFilter::Failed => self.failed,
            RunFilter::Running => self.running,
        }
    }
}

/// One execution in a runs listing, with the activity it searched for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunListing {
    pub execution_id: u64,
    pub activity_id: u64,
    pub status: ExecutionStatus,
    pub total_steps: u32,
    pub steps_completed: u32,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Destination of the activity
    pub location: String,
    /// Free-text query of the activity
    pub query: String,
    /// Adults plus children
    pub guest_count: u32,
    /// COMPLETED listings stored for the activity
    pub result_count: usize,
}

/// A filtered runs listing together with the per-filter counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunsReport {
    pub filter: RunFilter,
    pub counts: RunCounts,
    pub runs: Vec<RunListing>,
}
