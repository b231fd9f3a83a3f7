//! Extracted listing storage.

use jiff::Timestamp;
use rusqlite::{Connection, params};

use super::rows;
use crate::{
    error::{DatabaseResultExt, Result},
    models::{NewSearchResult, SearchResult, SearchStatus},
};

const INSERT_RESULT_SQL: &str = "INSERT INTO searches (activity_id, source_url, website_name, property_name, price, rating, booking_url, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const SELECT_RESULTS_BY_STATUS_SQL: &str = "SELECT id, activity_id, source_url, website_name, property_name, price, rating, booking_url, status, created_at FROM searches WHERE activity_id = ?1 AND status = ?2 ORDER BY id DESC";

/// Writes `results` for an activity on `conn` and returns how many were
/// written. Called inside the transaction that completes the execution.
pub(super) fn insert_rows(
    conn: &Connection,
    activity_id: u64,
    results: &[NewSearchResult],
) -> Result<usize> {
    let now = Timestamp::now().to_string();
    let mut stmt = conn
        .prepare(INSERT_RESULT_SQL)
        .db_context("Failed to prepare insert")?;
    for result in results {
        stmt.execute(params![
            activity_id as i64,
            &result.source_url,
            &result.website_name,
            &result.property_name,
            result.price,
            result.rating,
            &result.booking_url,
            result.status.as_str(),
            &now
        ])
        .db_context("Failed to insert search result")?;
    }
    Ok(results.len())
}

impl super::Database {
    /// COMPLETED listings of an activity, newest first.
    pub fn list_completed_results(&self, activity_id: u64) -> Result<Vec<SearchResult>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RESULTS_BY_STATUS_SQL)
            .db_context("Failed to prepare query")?;

        let results = stmt
            .query_map(
                params![activity_id as i64, SearchStatus::Completed.as_str()],
                |row| {
                    Ok(SearchResult {
                        id: rows::id(row, 0)?,
                        activity_id: rows::id(row, 1)?,
                        source_url: row.get(2)?,
                        website_name: row.get(3)?,
                        property_name: row.get(4)?,
                        price: row.get(5)?,
                        rating: row.get(6)?,
                        booking_url: row.get(7)?,
                        status: rows::parsed(row, 8)?,
                        created_at: rows::timestamp(row, 9)?,
                    })
                },
            )
            .db_context("Failed to query search results")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read search results")?;

        Ok(results)
    }
}
