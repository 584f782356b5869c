//! lb-migrate - Additive schema migration runner
//!
//! Brings the bot's managed tables up to a declarative [`TargetSchema`]
//! without ever dropping or renaming anything. A run backs up the database
//! file, then for each table introspects the live columns, plans the missing
//! ones, and applies the plan in its own transaction.
//!
//! [`TargetSchema`]: lb_core::TargetSchema

pub mod backup;
pub mod connection;
pub mod ddl;
pub mod error;
pub mod execute;
pub mod introspect;
pub mod plan;
pub mod runner;
pub mod verify;

pub use backup::{create_backup, BackupArtifact, BackupOutcome};
pub use connection::MigrationDb;
pub use ddl::{Statement, StatementKind};
pub use error::{MigrateError, MigrateResult};
pub use execute::{apply, ExecutionReport};
pub use introspect::LiveColumn;
pub use plan::{plan, PlannedBackfill, TablePlan};
pub use runner::{
    MigrationRunner, RunOptions, RunPhase, RunReport, TableOutcome, TableStatus,
};
pub use verify::{report, TableVerification, VerificationSummary};
