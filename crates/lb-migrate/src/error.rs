//! Error types for the migration runner.

use crate::ddl::StatementKind;
use lb_core::CoreError;
use thiserror::Error;

/// Migration runner errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Failed to open or create the database (M001).
    #[error("[M001] Database connection failed: {0}")]
    ConnectionError(String),

    /// The pre-run backup could not be written or verified (M002).
    ///
    /// Raised before any statement touches the database.
    #[error("[M002] Backup of '{path}' failed: {message}")]
    BackupFailed { path: String, message: String },

    /// A DDL or DML statement failed; the table's transaction was rolled back (M003).
    #[error("[M003] {kind} on table '{table}' failed: {message}")]
    SchemaFailure {
        table: String,
        kind: StatementKind,
        message: String,
    },

    /// Reading the live structure of a table failed (M004).
    #[error("[M004] Introspection of table '{table}' failed: {message}")]
    IntrospectionError { table: String, message: String },

    /// Transaction management error (M005).
    #[error("[M005] Transaction failed: {0}")]
    TransactionError(String),

    /// Configuration or schema error from lb-core (M006).
    #[error("[M006] {0}")]
    Core(#[from] CoreError),

    /// SQLite driver error with preserved source chain (M007).
    #[error("[M007] SQLite error")]
    Sqlite(#[source] rusqlite::Error),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<rusqlite::Error> for MigrateError {
    fn from(err: rusqlite::Error) -> Self {
        MigrateError::Sqlite(err)
    }
}

impl MigrateError {
    pub(crate) fn backup(path: &std::path::Path, message: impl std::fmt::Display) -> Self {
        MigrateError::BackupFailed {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
