//! Error types for the execution engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::driver::DriverError;

/// Comprehensive error type for all engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Lookup of an execution or activity that does not exist
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: u64 },
    /// A step was built with parameters its task definition rejects
    #[error("Invalid parameters for step '{step}': {reason}")]
    InvalidStepParameters { step: String, reason: String },
    /// The driver could not resolve a locator within the allowed wait
    #[error("Element not found: {locator}")]
    ElementNotFound { locator: String },
    /// Page did not reach an interactive state in time
    #[error("Navigation timed out: {detail}")]
    NavigationTimeout { detail: String },
    /// Result listing never appeared after the search was submitted
    #[error("Timed out waiting for results matching '{locator}'")]
    ExtractionTimeout { locator: String },
    /// A step required a resource that no earlier step produced
    #[error("Execution context has no '{resource}' handle")]
    ContextMissing { resource: &'static str },
    /// The run was cancelled before it reached a terminal state
    #[error("Execution cancelled")]
    Cancelled,
    /// Another writer moved the execution out of the state the run needs
    #[error("Execution {id} is no longer {expected}")]
    StateChanged { id: u64, expected: &'static str },
    /// Any other browser driver failure
    #[error("Browser driver error: {0}")]
    Driver(#[from] DriverError),
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> EngineError {
        EngineError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl EngineError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates an error for a step whose parameters fail validation.
    pub fn invalid_step(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStepParameters {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for lookups on unknown ids.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| EngineError::database(message).with_source(e))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
