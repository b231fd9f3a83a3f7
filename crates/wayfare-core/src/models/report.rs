//! Read models returned by the polling queries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Activity, ExecutionStatus, SearchResult, WorkflowExecution};

/// Polling view of one execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionReport {
    /// Execution ID
    pub id: u64,
    /// Activity whose results the run produces
    pub activity_id: u64,
    /// Lifecycle state
    pub status: ExecutionStatus,
    /// `steps_completed / total_steps`, `0.0` before the run starts
    pub progress: f64,
    /// Number of steps started so far
    pub steps_completed: u32,
    /// Number of steps in the run
    pub total_steps: u32,
    /// Display name of the step being attempted
    pub current_step: Option<String>,
    /// When a worker started the run
    pub started_at: Option<Timestamp>,
    /// When the run reached a terminal state
    pub completed_at: Option<Timestamp>,
    /// Failure description for failed runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&WorkflowExecution> for ExecutionReport {
    fn from(execution: &WorkflowExecution) -> Self {
        Self {
            id: execution.id,
            activity_id: execution.activity_id,
            status: execution.status,
            progress: execution.progress(),
            steps_completed: execution.steps_completed,
            total_steps: execution.total_steps,
            current_step: execution.current_step.clone(),
            started_at: execution.started_at,
            completed_at: execution.completed_at,
            error_message: execution.error_message.clone(),
        }
    }
}

impl ExecutionReport {
    /// Progress as a whole percentage, for display.
    pub fn percent(&self) -> u32 {
        (self.progress * 100.0).round() as u32
    }
}

/// An activity together with its completed results, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityResults {
    pub activity: Activity,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
}

impl ActivityResults {
    pub fn new(activity: Activity, results: Vec<SearchResult>) -> Self {
        let total_results = results.len();
        Self {
            activity,
            results,
            total_results,
        }
    }
}
