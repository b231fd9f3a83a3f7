//! Workflow execution model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ExecutionStatus;

/// Label stored on an execution before its first step starts.
pub const INITIAL_STEP_LABEL: &str = "Initializing...";

/// Persisted record of one run of the workflow executor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowExecution {
    /// Unique identifier for the execution
    pub id: u64,

    /// Activity this run searches for
    pub activity_id: u64,

    /// Current lifecycle state
    pub status: ExecutionStatus,

    /// Number of steps in the run (0 until the run starts)
    pub total_steps: u32,

    /// 1-based index of the most recently started step
    pub steps_completed: u32,

    /// Display name of the most recently started step
    pub current_step: Option<String>,

    /// Timestamp when the record was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when a worker marked the run as running (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,

    /// Timestamp when the run reached a terminal state (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    /// Failure description, set only for failed runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl WorkflowExecution {
    /// Fraction of steps started, in `[0, 1]`.
    ///
    /// Returns `0.0` while `total_steps` is still zero.
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        f64::from(self.steps_completed.min(self.total_steps)) / f64::from(self.total_steps)
    }
}
