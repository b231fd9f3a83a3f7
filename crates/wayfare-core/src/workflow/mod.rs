//! Sequencing of one workflow run.
//!
//! A [`WorkflowExecutor`] is bound to one execution record. It builds the
//! step list, persists progress before each step, runs the steps strictly in
//! order through [`execute_step`], extracts the listings and stores the
//! terminal status. Its browser session is released on every exit path,
//! including when the run future is dropped.
//!
//! ```text
//! PENDING ──mark_running──▶ RUNNING ──steps + extraction ok──▶ COMPLETED
//!    │                         │
//!    └──────── any error ──────┴──────────────────────────────▶ FAILED
//! ```

use std::sync::Arc;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    catalog::{self, TaskKind},
    config::EngineConfig,
    context::ExecutionContext,
    driver::BrowserDriver,
    error::{EngineError, Result},
    executors::execute_step,
    models::{ExecutionStatus, NewSearchResult, SearchRequest},
    step::Step,
    store::Store,
};

mod extract;
mod steps;

pub use extract::{parse_price, parse_rating};
pub use steps::build_booking_steps;

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps_executed: usize,
    pub results_saved: usize,
}

/// Runs the booking workflow for one execution record.
pub struct WorkflowExecutor {
    execution_id: u64,
    activity_id: u64,
    driver: Arc<dyn BrowserDriver>,
    store: Store,
    config: Arc<EngineConfig>,
    cancel: CancellationToken,
    context: ExecutionContext,
}

impl WorkflowExecutor {
    pub fn new(
        execution_id: u64,
        activity_id: u64,
        driver: Arc<dyn BrowserDriver>,
        store: Store,
        config: Arc<EngineConfig>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            execution_id,
            activity_id,
            driver,
            store,
            config,
            cancel,
            context: ExecutionContext::new(),
        }
    }

    pub fn execution_id(&self) -> u64 {
        self.execution_id
    }

    /// Runs the whole search and records its terminal status.
    ///
    /// On failure the execution is marked FAILED with the error's message
    /// before the error is returned. Listings are stored only together with
    /// the COMPLETED transition, so a run that lost its RUNNING state to
    /// another writer stores nothing.
    pub async fn execute_booking_search(&mut self, request: &SearchRequest) -> Result<RunSummary> {
        let steps = build_booking_steps(request, &self.config.site);
        info!(
            "Execution {} started for activity {} ({} steps)",
            self.execution_id,
            self.activity_id,
            steps.len()
        );

        let outcome = self.run(&steps).await;
        self.context.release(self.driver.as_ref()).await;

        let outcome = match outcome {
            Ok(results) => self.finish(steps.len(), results).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            match self
                .store
                .fail_execution(self.execution_id, e.to_string())
                .await
            {
                Ok(true) => {}
                Ok(false) => debug!(
                    "Execution {} already terminal, keeping its stored state",
                    self.execution_id
                ),
                Err(store_err) => warn!(
                    "Failed to record failure of execution {}: {store_err}",
                    self.execution_id
                ),
            }
        }
        outcome
    }

    async fn run(&mut self, steps: &[Step]) -> Result<Vec<NewSearchResult>> {
        self.ensure_active()?;
        let total = u32::try_from(steps.len()).map_err(|_| EngineError::Configuration {
            message: format!("Too many steps: {}", steps.len()),
        })?;
        if !self.store.mark_running(self.execution_id, total).await? {
            return Err(self.state_changed(ExecutionStatus::Pending));
        }

        for (index, step) in steps.iter().enumerate() {
            self.ensure_active()?;
            catalog::definition(step.kind()).validate(step)?;

            let recorded = self
                .store
                .record_progress(self.execution_id, index as u32 + 1, step.display_name.clone())
                .await?;
            if !recorded {
                return Err(self.state_changed(ExecutionStatus::Running));
            }
            debug!(
                "Execution {}: step {}/{} {}",
                self.execution_id,
                index + 1,
                total,
                step.id
            );

            // A launch is never interrupted: the session it opens has to
            // reach the context so that release() can close it.
            let update = if step.kind() == TaskKind::LaunchBrowser {
                execute_step(step, self.driver.as_ref(), &self.config.timeouts, &self.context)
                    .await?
            } else {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Err(EngineError::Cancelled),
                    result = execute_step(step, self.driver.as_ref(), &self.config.timeouts, &self.context) => result?,
                }
            };
            self.context.apply(update);
            self.ensure_active()?;

            self.settle().await?;
        }

        let page = self.context.page()?;
        let results = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(EngineError::Cancelled),
            result = extract::extract_listings(
                self.driver.as_ref(),
                page,
                &self.config.site,
                &self.config.timeouts,
                self.config.result_cap,
            ) => result?,
        };
        Ok(results)
    }

    /// Stores the listings with the COMPLETED transition.
    async fn finish(
        &self,
        steps_executed: usize,
        results: Vec<NewSearchResult>,
    ) -> Result<RunSummary> {
        let results_saved = self
            .store
            .complete_with_results(self.execution_id, self.activity_id, results)
            .await?
            .ok_or_else(|| self.state_changed(ExecutionStatus::Running))?;
        info!(
            "Execution {} completed with {results_saved} results",
            self.execution_id
        );
        Ok(RunSummary {
            steps_executed,
            results_saved,
        })
    }

    fn state_changed(&self, expected: ExecutionStatus) -> EngineError {
        EngineError::StateChanged {
            id: self.execution_id,
            expected: expected.as_str(),
        }
    }

    fn ensure_active(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn settle(&self) -> Result<()> {
        if self.config.settle_delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = self.cancel.cancelled() => Err(EngineError::Cancelled),
            _ = tokio::time::sleep(self.config.settle_delay) => Ok(()),
        }
    }
}

impl Drop for WorkflowExecutor {
    fn drop(&mut self) {
        let Some(session) = self.context.take_browser() else {
            return;
        };
        let driver = Arc::clone(&self.driver);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = driver.close(&session).await {
                        warn!("Failed to close abandoned session {}: {e}", session.0);
                    }
                });
            }
            Err(_) => warn!("No runtime to close abandoned session {}", session.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jiff::civil::date;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        driver::{DriverAction, RawListing, ScriptedDriver},
        models::ExecutionStatus,
    };

    fn request() -> SearchRequest {
        SearchRequest {
            query: "family trip".to_string(),
            location: "Lisbon".to_string(),
            start_date: date(2025, 7, 14),
            end_date: date(2025, 7, 18),
            adult_count: 2,
            child_count: 1,
            activity_type: Default::default(),
        }
    }

    fn config() -> Arc<EngineConfig> {
        Arc::new(EngineConfig::default().with_settle_delay(Duration::ZERO))
    }

    async fn setup(driver: Arc<ScriptedDriver>) -> (TempDir, Store, WorkflowExecutor) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("test.db"));
        let (activity, execution) = store.create_search(request()).await.unwrap();
        let executor = WorkflowExecutor::new(
            execution.id,
            activity.id,
            driver,
            store.clone(),
            config(),
            CancellationToken::new(),
        );
        (dir, store, executor)
    }

    #[tokio::test]
    async fn test_successful_run() {
        let listing = RawListing {
            name: "Casa Azul".to_string(),
            price: "€ 1,240".to_string(),
            rating: "8.7".to_string(),
            url: "https://example.com/casa-azul".to_string(),
        };
        let driver = Arc::new(ScriptedDriver::new().with_listings(vec![listing]));
        let (_dir, store, mut executor) = setup(driver.clone()).await;

        let summary = executor.execute_booking_search(&request()).await.unwrap();
        assert_eq!(summary.steps_executed, 9);
        assert_eq!(summary.results_saved, 1);

        let execution = store
            .get_execution(executor.execution_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(execution.status, ExecutionStatus::Completed);
        assert_eq!(execution.steps_completed, 9);
        assert_eq!(execution.current_step.as_deref(), Some("Click Search"));
        assert!(execution.completed_at.is_some());
        assert!(execution.error_message.is_none());
        assert_eq!(driver.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let driver = Arc::new(ScriptedDriver::new());
        let (_dir, store, mut executor) = setup(driver.clone()).await;
        executor.cancel.cancel();

        let err = executor.execute_booking_search(&request()).await.unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
        assert_eq!(driver.launched(), 0);

        let execution = store
            .get_execution(executor.execution_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(execution.status, ExecutionStatus::Failed);
        assert_eq!(execution.error_message.as_deref(), Some("Execution cancelled"));
    }

    #[tokio::test]
    async fn test_dropped_run_closes_session() {
        let driver = Arc::new(ScriptedDriver::new().with_action_delay(Duration::from_millis(20)));
        let (_dir, _store, mut executor) = setup(driver.clone()).await;

        // Abandon the run once the second step has started
        let watcher = driver.clone();
        let request = request();
        tokio::select! {
            result = executor.execute_booking_search(&request) => {
                panic!("run finished early: {result:?}");
            }
            _ = async move {
                while !watcher
                    .actions()
                    .iter()
                    .any(|a| matches!(a, DriverAction::WaitFor { locator } if locator.contains("ss")))
                {
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
            } => {}
        }
        assert_eq!(driver.open_sessions(), 1);
        drop(executor);

        for _ in 0..50 {
            if driver.open_sessions() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(driver.open_sessions(), 0);
        assert_eq!(driver.closed(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_when_another_writer_fails_it() {
        let listing = RawListing {
            name: "Casa Verde".to_string(),
            ..RawListing::default()
        };
        let driver = Arc::new(
            ScriptedDriver::new()
                .with_listings(vec![listing])
                .with_action_delay(Duration::from_millis(20)),
        );
        let (_dir, store, mut executor) = setup(driver.clone()).await;
        let id = executor.execution_id();
        let activity_id = executor.activity_id;

        // Another process marks the run failed through the database only
        let other = store.clone();
        let interrupt = async move {
            while other.get_execution(id).await.unwrap().unwrap().steps_completed < 2 {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
            assert!(
                other
                    .fail_execution(id, "Execution cancelled".to_string())
                    .await
                    .unwrap()
            );
        };
        let request = request();
        let (outcome, ()) = tokio::join!(executor.execute_booking_search(&request), interrupt);

        let err = outcome.unwrap_err();
        assert!(matches!(
            err,
            EngineError::StateChanged { expected: "RUNNING", .. }
        ));

        let execution = store.get_execution(id).await.unwrap().unwrap();
        assert_eq!(execution.status, ExecutionStatus::Failed);
        assert_eq!(execution.error_message.as_deref(), Some("Execution cancelled"));
        assert!(execution.steps_completed < 9);

        assert!(store.list_completed_results(activity_id).await.unwrap().is_empty());
        assert_eq!(driver.open_sessions(), 0);
        assert!(!driver.actions().iter().any(
            |a| matches!(a, DriverAction::Evaluate { script } if *script == crate::driver::scripts::EXTRACT_LISTINGS.name)
        ));
    }
}
