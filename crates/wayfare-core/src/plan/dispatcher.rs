//! Background task that turns queued jobs into running workflows.
//!
//! The dispatcher owns each run's whole lifecycle: it waits for a slot when
//! a concurrency cap is configured, runs the [`WorkflowExecutor`] in its own
//! task so a panic is contained, records failures the executor could not
//! record itself and forgets the run's cancellation token afterwards.

use std::{collections::HashMap, sync::Arc};

use log::{debug, error, info, warn};
use tokio::{
    sync::{Mutex, Semaphore, mpsc},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::EngineConfig, driver::BrowserDriver, error::EngineError, models::SearchRequest,
    store::Store, workflow::WorkflowExecutor,
};

/// Cancellation tokens of runs that have been queued and not yet finished.
pub(crate) type ActiveRuns = Arc<Mutex<HashMap<u64, CancellationToken>>>;

/// One queued run.
pub(crate) struct Job {
    pub execution_id: u64,
    pub activity_id: u64,
    pub request: SearchRequest,
    pub cancel: CancellationToken,
}

pub(crate) struct Dispatcher {
    store: Store,
    driver: Arc<dyn BrowserDriver>,
    config: Arc<EngineConfig>,
    active: ActiveRuns,
    limiter: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    pub(crate) fn new(
        store: Store,
        driver: Arc<dyn BrowserDriver>,
        config: Arc<EngineConfig>,
        active: ActiveRuns,
    ) -> Self {
        let limiter = config
            .max_concurrent_runs
            .map(|limit| Arc::new(Semaphore::new(limit)));
        Self {
            store,
            driver,
            config,
            active,
            limiter,
        }
    }

    /// Receives jobs until shutdown or until every sender is gone, then
    /// waits for the runs in flight.
    pub(crate) async fn run(
        self,
        mut jobs: mpsc::UnboundedReceiver<Job>,
        shutdown: CancellationToken,
    ) {
        let this = Arc::new(self);
        let mut runs = JoinSet::new();
        info!(
            "Dispatcher started (max concurrent runs: {})",
            this.config
                .max_concurrent_runs
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Dispatcher shutting down");
                    break;
                }
                job = jobs.recv() => match job {
                    Some(job) => {
                        debug!("Dispatching execution {}", job.execution_id);
                        runs.spawn(Arc::clone(&this).dispatch(job));
                    }
                    None => break,
                },
                Some(_) = runs.join_next(), if !runs.is_empty() => {}
            }
        }

        // Jobs still queued never started
        jobs.close();
        while let Ok(job) = jobs.try_recv() {
            job.cancel.cancel();
            this.record_failure(job.execution_id, &EngineError::Cancelled.to_string())
                .await;
            this.active.lock().await.remove(&job.execution_id);
        }

        while runs.join_next().await.is_some() {}
        info!("Dispatcher stopped");
    }

    async fn dispatch(self: Arc<Self>, job: Job) {
        let Job {
            execution_id,
            activity_id,
            request,
            cancel,
        } = job;

        // Waiting for a slot ends early on cancellation; the executor then
        // fails the run as cancelled without launching a browser.
        let _permit = match &self.limiter {
            Some(limiter) => tokio::select! {
                permit = Arc::clone(limiter).acquire_owned() => permit.ok(),
                _ = cancel.cancelled() => None,
            },
            None => None,
        };

        let mut executor = WorkflowExecutor::new(
            execution_id,
            activity_id,
            Arc::clone(&self.driver),
            self.store.clone(),
            Arc::clone(&self.config),
            cancel,
        );
        let outcome =
            tokio::spawn(async move { executor.execute_booking_search(&request).await }).await;

        match outcome {
            Ok(Ok(summary)) => {
                debug!(
                    "Execution {execution_id} finished: {} steps, {} results",
                    summary.steps_executed, summary.results_saved
                );
                if let Err(e) = self.store.touch_activity(activity_id).await {
                    warn!("Failed to update activity {activity_id}: {e}");
                }
            }
            Ok(Err(e)) => {
                error!("Execution {execution_id} failed: {e}");
                self.record_failure(execution_id, &e.to_string()).await;
            }
            Err(e) => {
                error!("Execution {execution_id} aborted: {e}");
                self.record_failure(execution_id, &format!("Execution aborted: {e}"))
                    .await;
            }
        }

        self.active.lock().await.remove(&execution_id);
    }

    /// Marks the run FAILED unless it already reached a terminal state.
    async fn record_failure(&self, execution_id: u64, message: &str) {
        match self
            .store
            .fail_execution(execution_id, message.to_string())
            .await
        {
            Ok(true) => debug!("Execution {execution_id} marked failed"),
            Ok(false) => {}
            Err(e) => error!("Failed to mark execution {execution_id} failed: {e}"),
        }
    }
}
