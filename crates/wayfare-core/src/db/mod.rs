//! SQLite persistence for activities, executions and extracted results.
//!
//! A [`Database`] wraps one connection. Callers open a fresh one per
//! operation (see [`crate::store::Store`]), so every connection applies the
//! same pragmas: foreign keys on, WAL journaling and a busy timeout so
//! concurrent runs wait for each other's writes instead of failing.

use std::{path::Path, time::Duration};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod activity_queries;
pub mod execution_queries;
pub mod migrations;
pub mod result_queries;
mod rows;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection and makes sure the schema exists.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
