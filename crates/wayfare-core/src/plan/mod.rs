//! Job lifecycle: create, dispatch and report on workflow runs.
//!
//! [`ExecutionPlan`] is the engine's entry point. Creating a search persists
//! an activity and a PENDING execution, hands a job to the dispatcher task
//! and returns the execution id at once. Callers then poll
//! [`ExecutionPlan::get_execution_status`] and
//! [`ExecutionPlan::get_activity_results`] while the run progresses in the
//! background.
//!
//! ```text
//! ┌──────────────┐  job   ┌──────────────┐ spawn ┌──────────────────┐
//! │ ExecutionPlan│───────▶│  Dispatcher  │──────▶│ WorkflowExecutor │
//! └──────┬───────┘        └──────────────┘       └────────┬─────────┘
//!        │ poll                                           │ progress
//!        ▼                                                ▼
//!   ┌──────────────────────── SQLite ──────────────────────────┐
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use jiff::civil::date;
//! use wayfare_core::{
//!     ExecutionPlanBuilder,
//!     driver::ScriptedDriver,
//!     models::SearchRequest,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = ExecutionPlanBuilder::new()
//!     .with_database_path(Some("/tmp/wayfare.db"))
//!     .with_driver(Arc::new(ScriptedDriver::new()))
//!     .build()
//!     .await?;
//!
//! let execution_id = plan
//!     .create_and_execute_search(SearchRequest {
//!         query: "weekend in Porto".to_string(),
//!         location: "Porto".to_string(),
//!         start_date: date(2025, 9, 12),
//!         end_date: date(2025, 9, 14),
//!         adult_count: 2,
//!         child_count: 0,
//!         activity_type: Default::default(),
//!     })
//!     .await?;
//!
//! let report = plan
//!     .wait_for_execution(execution_id, Duration::from_millis(250))
//!     .await?;
//! let results = plan.get_activity_results(report.activity_id).await?;
//! println!("{} listings", results.total_results);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::{debug, info};
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

mod builder;
mod dispatcher;

pub use builder::ExecutionPlanBuilder;
use dispatcher::{ActiveRuns, Job};

use crate::{
    error::{EngineError, Result},
    models::{ActivityResults, ExecutionReport, RunFilter, RunsReport, SearchRequest},
    store::Store,
};

/// Creates workflow runs and answers polling queries about them.
pub struct ExecutionPlan {
    store: Store,
    jobs: mpsc::UnboundedSender<Job>,
    active: ActiveRuns,
    shutdown: CancellationToken,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl ExecutionPlan {
    /// Stores the search and queues its run, returning the execution id
    /// without waiting for the run.
    pub async fn create_and_execute_search(&self, request: SearchRequest) -> Result<u64> {
        request.validate()?;

        let (activity, execution) = self.store.create_search(request.clone()).await?;
        let cancel = self.shutdown.child_token();
        self.active
            .lock()
            .await
            .insert(execution.id, cancel.clone());

        let job = Job {
            execution_id: execution.id,
            activity_id: activity.id,
            request,
            cancel,
        };
        if self.jobs.send(job).is_err() {
            self.active.lock().await.remove(&execution.id);
            let message = "Execution plan is shut down".to_string();
            self.store
                .fail_execution(execution.id, message.clone())
                .await?;
            return Err(EngineError::Configuration { message });
        }

        info!(
            "Queued execution {} for activity {} ({})",
            execution.id, activity.id, activity.location
        );
        Ok(execution.id)
    }

    /// Current state of an execution.
    pub async fn get_execution_status(&self, execution_id: u64) -> Result<ExecutionReport> {
        let execution = self
            .store
            .get_execution(execution_id)
            .await?
            .ok_or(EngineError::NotFound {
                resource: "Execution",
                id: execution_id,
            })?;
        Ok(ExecutionReport::from(&execution))
    }

    /// An activity with its completed results, newest first.
    pub async fn get_activity_results(&self, activity_id: u64) -> Result<ActivityResults> {
        let activity = self
            .store
            .get_activity(activity_id)
            .await?
            .ok_or(EngineError::NotFound {
                resource: "Activity",
                id: activity_id,
            })?;
        let results = self.store.list_completed_results(activity_id).await?;
        Ok(ActivityResults::new(activity, results))
    }

    /// Cancels a run that has not finished yet.
    ///
    /// Returns false when the execution already reached a terminal state. A
    /// run queued by another process cannot be interrupted, but its record
    /// is still marked FAILED.
    pub async fn cancel_execution(&self, execution_id: u64) -> Result<bool> {
        // A finished run stays in `active` until the dispatcher forgets it
        if self.get_execution_status(execution_id).await?.status.is_terminal() {
            return Ok(false);
        }
        if let Some(token) = self.active.lock().await.get(&execution_id) {
            debug!("Cancelling execution {execution_id}");
            token.cancel();
            return Ok(true);
        }

        self.store
            .fail_execution(execution_id, EngineError::Cancelled.to_string())
            .await
    }

    /// Executions matching `filter`, newest first, with how many runs each
    /// filter would show.
    pub async fn list_executions(&self, filter: RunFilter) -> Result<RunsReport> {
        self.store.list_executions(filter).await
    }

    /// Polls until the execution reaches a terminal state.
    pub async fn wait_for_execution(
        &self,
        execution_id: u64,
        poll_interval: Duration,
    ) -> Result<ExecutionReport> {
        loop {
            let report = self.get_execution_status(execution_id).await?;
            if report.status.is_terminal() {
                return Ok(report);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Number of runs queued or in flight in this process.
    pub async fn active_runs(&self) -> usize {
        self.active.lock().await.len()
    }

    /// Stops the dispatcher, cancels every active run and waits for them to
    /// record their terminal state.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown.cancel();
        let handle = self.dispatcher.lock().await.take();
        if let Some(handle) = handle {
            handle.await.map_err(EngineError::join)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
