//! Activity creation and lookup.

use jiff::Timestamp;
use rusqlite::{OptionalExtension, params};

use super::rows;
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Activity, INITIAL_STEP_LABEL, SearchRequest, WorkflowExecution},
};

const INSERT_ACTIVITY_SQL: &str = "INSERT INTO activities (query, activity_type, location, start_date, end_date, adult_count, child_count, date_flexible, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const INSERT_EXECUTION_SQL: &str = "INSERT INTO workflow_executions (activity_id, status, total_steps, steps_completed, current_step, created_at) VALUES (?1, 'PENDING', 0, 0, ?2, ?3)";
const SELECT_ACTIVITY_SQL: &str = "SELECT id, query, activity_type, location, start_date, end_date, adult_count, child_count, date_flexible, created_at, updated_at FROM activities WHERE id = ?1";
const TOUCH_ACTIVITY_SQL: &str = "UPDATE activities SET updated_at = ?1 WHERE id = ?2";

impl super::Database {
    /// Stores an activity for `request` together with its PENDING execution.
    ///
    /// Both rows are written in one transaction, so a caller never sees an
    /// activity without the execution that will search for it.
    pub fn create_search(
        &mut self,
        request: &SearchRequest,
    ) -> Result<(Activity, WorkflowExecution)> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_ACTIVITY_SQL,
            params![
                &request.query,
                request.activity_type.as_str(),
                &request.location,
                request.start_date.to_string(),
                request.end_date.to_string(),
                request.adult_count,
                request.child_count,
                false,
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert activity")?;
        let activity_id = tx.last_insert_rowid() as u64;

        tx.execute(
            INSERT_EXECUTION_SQL,
            params![activity_id as i64, INITIAL_STEP_LABEL, &now_str],
        )
        .db_context("Failed to insert workflow execution")?;
        let execution_id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        let activity = Activity {
            id: activity_id,
            query: request.query.clone(),
            activity_type: request.activity_type,
            location: request.location.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            adult_count: request.adult_count,
            child_count: request.child_count,
            date_flexible: false,
            created_at: now,
            updated_at: now,
        };
        let execution = WorkflowExecution {
            id: execution_id,
            activity_id,
            status: Default::default(),
            total_steps: 0,
            steps_completed: 0,
            current_step: Some(INITIAL_STEP_LABEL.to_string()),
            created_at: now,
            started_at: None,
            completed_at: None,
            error_message: None,
        };
        Ok((activity, execution))
    }

    /// Retrieves an activity by its ID.
    pub fn get_activity(&self, id: u64) -> Result<Option<Activity>> {
        self.connection
            .query_row(SELECT_ACTIVITY_SQL, params![id as i64], |row| {
                Ok(Activity {
                    id: rows::id(row, 0)?,
                    query: row.get(1)?,
                    activity_type: rows::parsed(row, 2)?,
                    location: row.get(3)?,
                    start_date: rows::date(row, 4)?,
                    end_date: rows::date(row, 5)?,
                    adult_count: row.get(6)?,
                    child_count: row.get(7)?,
                    date_flexible: row.get(8)?,
                    created_at: rows::timestamp(row, 9)?,
                    updated_at: rows::timestamp(row, 10)?,
                })
            })
            .optional()
            .db_context("Failed to query activity")
    }

    /// Bumps an activity's `updated_at`. Returns false for unknown ids.
    pub fn touch_activity(&self, id: u64) -> Result<bool> {
        let changed = self
            .connection
            .execute(TOUCH_ACTIVITY_SQL, params![Timestamp::now().to_string(), id as i64])
            .db_context("Failed to update activity timestamp")?;
        Ok(changed > 0)
    }
}
