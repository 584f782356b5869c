//! Database connection wrapper.
//!
//! [`MigrationDb`] owns a SQLite [`Connection`] for the duration of one
//! migration run and provides the per-table transaction helper.

use crate::error::{MigrateError, MigrateResult};
use rusqlite::Connection;
use std::path::Path;

/// Wrapper around the connection to the bot's database file.
///
/// Single-threaded: one run, one connection, no `Mutex`.
pub struct MigrationDb {
    conn: Connection,
}

impl MigrationDb {
    /// Open (or create) the database at `path`.
    ///
    /// Opening never changes the schema; that is the runner's job.
    pub fn open(path: &Path) -> MigrateResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| MigrateError::ConnectionError(format!("{e}: {}", path.display())))?;
        log::debug!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    /// Create an empty in-memory database.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> MigrateResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| MigrateError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    ///
    /// SQLite DDL is transactional, so created tables and added columns are
    /// undone together with the rows written next to them. A failed `COMMIT`
    /// (for example a deferred constraint) is rolled back as well.
    pub fn transaction<F, T>(&self, body: F) -> MigrateResult<T>
    where
        F: FnOnce(&Connection) -> MigrateResult<T>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE TRANSACTION")
            .map_err(|e| MigrateError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(MigrateError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(e) => {
                log::debug!("Rolling back: {e}");
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK failed: {rollback_err}");
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
