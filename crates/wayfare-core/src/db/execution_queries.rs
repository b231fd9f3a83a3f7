//! Workflow execution lookup and guarded status transitions.
//!
//! Every transition is a single `UPDATE ... WHERE id = ? AND status ...`, so
//! a row that reached COMPLETED or FAILED is never modified again. The
//! transition methods return whether the row changed.

use jiff::Timestamp;
use rusqlite::{OptionalExtension, params};

use super::{result_queries, rows};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{ExecutionStatus, NewSearchResult, RunCounts, RunListing, WorkflowExecution},
};

const SELECT_EXECUTION_SQL: &str = "SELECT id, activity_id, status, total_steps, steps_completed, current_step, created_at, started_at, completed_at, error_message FROM workflow_executions WHERE id = ?1";
const MARK_RUNNING_SQL: &str = "UPDATE workflow_executions SET status = 'RUNNING', total_steps = ?2, started_at = ?3 WHERE id = ?1 AND status = 'PENDING'";
const RECORD_PROGRESS_SQL: &str = "UPDATE workflow_executions SET steps_completed = ?2, current_step = ?3 WHERE id = ?1 AND status = 'RUNNING' AND ?2 >= steps_completed AND ?2 <= total_steps";
const COMPLETE_EXECUTION_SQL: &str = "UPDATE workflow_executions SET status = 'COMPLETED', completed_at = ?2, error_message = NULL WHERE id = ?1 AND status = 'RUNNING'";
const LIST_EXECUTIONS_SQL: &str = "SELECT e.id, e.activity_id, e.status, e.total_steps, e.steps_completed, e.created_at, e.started_at, e.completed_at, e.error_message, a.location, a.query, a.adult_count + a.child_count, (SELECT COUNT(*) FROM searches s WHERE s.activity_id = e.activity_id AND s.status = 'COMPLETED') FROM workflow_executions e JOIN activities a ON a.id = e.activity_id WHERE ?1 IS NULL OR e.status = ?1 ORDER BY e.id DESC";
const COUNT_EXECUTIONS_SQL: &str = "SELECT COUNT(*), SUM(status = 'COMPLETED'), SUM(status = 'FAILED'), SUM(status = 'RUNNING') FROM workflow_executions";
const FAIL_EXECUTION_SQL: &str = "UPDATE workflow_executions SET status = 'FAILED', completed_at = ?3, error_message = ?2 WHERE id = ?1 AND status IN ('PENDING', 'RUNNING')";

impl super::Database {
    /// Retrieves an execution by its ID.
    pub fn get_execution(&self, id: u64) -> Result<Option<WorkflowExecution>> {
        self.connection
            .query_row(SELECT_EXECUTION_SQL, params![id as i64], |row| {
                Ok(WorkflowExecution {
                    id: rows::id(row, 0)?,
                    activity_id: rows::id(row, 1)?,
                    status: rows::parsed(row, 2)?,
                    total_steps: row.get(3)?,
                    steps_completed: row.get(4)?,
                    current_step: row.get(5)?,
                    created_at: rows::timestamp(row, 6)?,
                    started_at: rows::optional_timestamp(row, 7)?,
                    completed_at: rows::optional_timestamp(row, 8)?,
                    error_message: row.get(9)?,
                })
            })
            .optional()
            .db_context("Failed to query workflow execution")
    }

    /// PENDING → RUNNING, recording the number of steps and the start time.
    pub fn mark_running(&self, id: u64, total_steps: u32) -> Result<bool> {
        let changed = self
            .connection
            .execute(
                MARK_RUNNING_SQL,
                params![id as i64, total_steps, Timestamp::now().to_string()],
            )
            .db_context("Failed to mark execution running")?;
        Ok(changed > 0)
    }

    /// Records the step about to run.
    ///
    /// Ignored unless the run is RUNNING, `steps_completed` does not go
    /// backwards and stays within `total_steps`.
    pub fn record_progress(&self, id: u64, steps_completed: u32, current_step: &str) -> Result<bool> {
        let changed = self
            .connection
            .execute(
                RECORD_PROGRESS_SQL,
                params![id as i64, steps_completed, current_step],
            )
            .db_context("Failed to record execution progress")?;
        Ok(changed > 0)
    }

    /// PENDING or RUNNING → FAILED with `message`.
    pub fn fail_execution(&self, id: u64, message: &str) -> Result<bool> {
        let changed = self
            .connection
            .execute(
                FAIL_EXECUTION_SQL,
                params![id as i64, message, Timestamp::now().to_string()],
            )
            .db_context("Failed to mark execution failed")?;
        Ok(changed > 0)
    }

    /// RUNNING → COMPLETED, storing the run's listings in the same
    /// transaction.
    ///
    /// Returns `None` and writes nothing when the execution is no longer
    /// RUNNING, e.g. because another process cancelled it.
    pub fn complete_with_results(
        &mut self,
        id: u64,
        activity_id: u64,
        results: &[NewSearchResult],
    ) -> Result<Option<usize>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let changed = tx
            .execute(
                COMPLETE_EXECUTION_SQL,
                params![id as i64, Timestamp::now().to_string()],
            )
            .db_context("Failed to complete execution")?;
        if changed == 0 {
            return Ok(None);
        }

        let written = result_queries::insert_rows(&tx, activity_id, results)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(Some(written))
    }

    /// Executions with their activity, newest first. `None` lists every
    /// status.
    pub fn list_executions(&self, status: Option<ExecutionStatus>) -> Result<Vec<RunListing>> {
        let mut stmt = self
            .connection
            .prepare(LIST_EXECUTIONS_SQL)
            .db_context("Failed to prepare query")?;

        let runs = stmt
            .query_map(params![status.map(|s| s.as_str())], |row| {
                Ok(RunListing {
                    execution_id: rows::id(row, 0)?,
                    activity_id: rows::id(row, 1)?,
                    status: rows::parsed(row, 2)?,
                    total_steps: row.get(3)?,
                    steps_completed: row.get(4)?,
                    created_at: rows::timestamp(row, 5)?,
                    started_at: rows::optional_timestamp(row, 6)?,
                    completed_at: rows::optional_timestamp(row, 7)?,
                    error_message: row.get(8)?,
                    location: row.get(9)?,
                    query: row.get(10)?,
                    guest_count: row.get(11)?,
                    result_count: rows::count(row, 12)?,
                })
            })
            .db_context("Failed to query executions")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read executions")?;

        Ok(runs)
    }

    /// Number of executions overall and per listed status.
    pub fn count_executions(&self) -> Result<RunCounts> {
        self.connection
            .query_row(COUNT_EXECUTIONS_SQL, [], |row| {
                Ok(RunCounts {
                    all: rows::count(row, 0)?,
                    successful: rows::count(row, 1)?,
                    failed: rows::count(row, 2)?,
                    running: rows::count(row, 3)?,
                })
            })
            .db_context("Failed to count executions")
    }
}
