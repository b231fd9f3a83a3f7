//! Operation outcome messages.

use std::fmt;

/// One-line success or failure message.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}

/// Confirmation that a search was queued.
pub struct QueuedSearch {
    pub execution_id: u64,
}

impl fmt::Display for QueuedSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search queued. Execution ID: {}", self.execution_id)?;
        writeln!(f)?;
        writeln!(
            f,
            "Poll the execution status until it is COMPLETED or FAILED, then fetch the activity results."
        )
    }
}
