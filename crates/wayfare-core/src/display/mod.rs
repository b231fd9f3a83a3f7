//! Markdown presentation of engine data.
//!
//! Domain models implement [`std::fmt::Display`] in [`models`]; collections
//! and operation outcomes get small wrapper types. Every formatter produces
//! markdown so the CLI can render it with termimad and the MCP server can
//! return it as text content.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │  Display impls  │    │    Markdown     │
//! │ (reports, rows) │───▶│   & wrappers    │───▶│ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ```rust
//! use wayfare_core::display::{OperationStatus, QueuedSearch};
//!
//! let queued = QueuedSearch { execution_id: 12 };
//! assert!(queued.to_string().contains("Execution ID: 12"));
//!
//! let status = OperationStatus::failure("Execution 12 already finished");
//! assert!(status.to_string().starts_with("Error:"));
//! ```

pub mod catalog;
pub mod datetime;
pub mod models;
pub mod status;

pub use catalog::Catalog;
pub use datetime::{LocalDateTime, RunDuration};
pub use status::{OperationStatus, QueuedSearch};
