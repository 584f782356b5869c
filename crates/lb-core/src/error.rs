//! Error types for lb-core

use thiserror::Error;

/// Core error type for the lessonbot migrator
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Identifier is not a plain SQL identifier
    #[error("[E003] Invalid identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// E004: Duplicate table in the target schema
    #[error("[E004] Duplicate table '{table}' in target schema")]
    DuplicateTable { table: String },

    /// E005: Duplicate column in a table specification
    #[error("[E005] Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// E006: A backfill or seed row references a column the table does not declare
    #[error("[E006] Table '{table}': {context} references unknown column '{column}'")]
    UnknownColumn {
        table: String,
        column: String,
        context: String,
    },

    /// E007: Table specification is structurally invalid
    #[error("[E007] Invalid table spec '{table}': {reason}")]
    InvalidTableSpec { table: String, reason: String },

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E009: YAML parse error
    #[error("[E009] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
