//! Async access to the SQLite database.
//!
//! Each call opens its own [`Database`] connection on tokio's blocking pool,
//! runs one operation and drops the connection.

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{
        Activity, NewSearchResult, RunFilter, RunsReport, SearchRequest, SearchResult,
        WorkflowExecution,
    },
};

/// Handle to the database file. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    pub async fn call<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(EngineError::join)?
    }

    pub async fn create_search(
        &self,
        request: SearchRequest,
    ) -> Result<(Activity, WorkflowExecution)> {
        self.call(move |db| db.create_search(&request)).await
    }

    pub async fn get_activity(&self, id: u64) -> Result<Option<Activity>> {
        self.call(move |db| db.get_activity(id)).await
    }

    pub async fn touch_activity(&self, id: u64) -> Result<bool> {
        self.call(move |db| db.touch_activity(id)).await
    }

    pub async fn get_execution(&self, id: u64) -> Result<Option<WorkflowExecution>> {
        self.call(move |db| db.get_execution(id)).await
    }

    pub async fn mark_running(&self, id: u64, total_steps: u32) -> Result<bool> {
        self.call(move |db| db.mark_running(id, total_steps)).await
    }

    pub async fn record_progress(
        &self,
        id: u64,
        steps_completed: u32,
        current_step: String,
    ) -> Result<bool> {
        self.call(move |db| db.record_progress(id, steps_completed, &current_step))
            .await
    }

    /// Completes a RUNNING execution and stores its listings atomically.
    /// `None` means the execution was no longer RUNNING and nothing was
    /// written.
    pub async fn complete_with_results(
        &self,
        id: u64,
        activity_id: u64,
        results: Vec<NewSearchResult>,
    ) -> Result<Option<usize>> {
        self.call(move |db| db.complete_with_results(id, activity_id, &results))
            .await
    }

    pub async fn fail_execution(&self, id: u64, message: String) -> Result<bool> {
        self.call(move |db| db.fail_execution(id, &message)).await
    }

    /// Executions matching `filter`, newest first, with the counts for
    /// every filter.
    pub async fn list_executions(&self, filter: RunFilter) -> Result<RunsReport> {
        self.call(move |db| {
            Ok(RunsReport {
                filter,
                counts: db.count_executions()?,
                runs: db.list_executions(filter.status())?,
            })
        })
        .await
    }

    pub async fn list_completed_results(&self, activity_id: u64) -> Result<Vec<SearchResult>> {
        self.call(move |db| db.list_completed_results(activity_id))
            .await
    }
}
