//! Core library for the Wayfare travel search engine.
//!
//! Wayfare turns a structured booking request into a fixed sequence of
//! browser steps, drives a browser through them in the background and stores
//! the extracted listings. Callers create a search, receive an execution id
//! at once and poll for progress and results.
//!
//! # Architecture
//!
//! - **Task catalog** ([`catalog`]): the step kinds the engine knows, their
//!   inputs, outputs and validation rules
//! - **Step executors** ([`executors`]): one async executor per task kind,
//!   each driving the browser through the [`driver::BrowserDriver`] seam
//! - **Workflow** ([`workflow`]): sequencing, progress tracking and listing
//!   extraction for one run
//! - **Execution plan** ([`plan`]): job creation, background dispatch,
//!   cancellation and polling queries
//! - **Display** ([`display`]): markdown formatting for the CLI and the MCP
//!   server
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use wayfare_core::{ExecutionPlanBuilder, driver::ScriptedDriver, params::CreateSearch};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = ExecutionPlanBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .with_driver(Arc::new(ScriptedDriver::new()))
//!     .build()
//!     .await?;
//!
//! let id = plan
//!     .create_and_execute_search(
//!         CreateSearch {
//!             location: "Lisbon".to_string(),
//!             start_date: "2025-07-14".to_string(),
//!             end_date: "2025-07-18".to_string(),
//!             adults: Some(2),
//!             ..Default::default()
//!         }
//!         .try_into()?,
//!     )
//!     .await?;
//!
//! let report = plan.wait_for_execution(id, Duration::from_millis(250)).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod db;
pub mod display;
pub mod driver;
pub mod error;
pub mod executors;
pub mod models;
pub mod params;
pub mod plan;
pub mod step;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use catalog::{TaskDefinition, TaskKind};
pub use config::{EngineConfig, SiteProfile, Timeouts};
pub use context::ExecutionContext;
pub use db::Database;
pub use display::{Catalog, LocalDateTime, OperationStatus, QueuedSearch, RunDuration};
pub use driver::{BrowserDriver, DriverError, ScriptedDriver, WebDriverClient};
pub use error::{EngineError, Result};
pub use models::{
    Activity, ActivityResults, ExecutionReport, ExecutionStatus, RunFilter, RunsReport,
    SearchRequest, SearchResult, WorkflowExecution,
};
pub use params::{CreateSearch, Id, ListRuns};
pub use plan::{ExecutionPlan, ExecutionPlanBuilder};
pub use step::{Step, StepParams};
pub use workflow::{RunSummary, WorkflowExecutor};
