//! The migration pipeline: backup, then plan and apply each managed table,
//! then verify.

use crate::backup::{self, BackupOutcome};
use crate::connection::MigrationDb;
use crate::error::{MigrateError, MigrateResult};
use crate::execute::{self, ExecutionReport};
use crate::introspect;
use crate::plan::{self, TablePlan};
use crate::verify::{self, VerificationSummary};
use lb_core::config::MEMORY_DB_PATH;
use lb_core::schema::TableSpec;
use lb_core::{TableName, TargetSchema};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a run is (or stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    BackedUp,
    Applying,
    Verified,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Start => "START",
            RunPhase::BackedUp => "BACKED_UP",
            RunPhase::Applying => "APPLYING",
            RunPhase::Verified => "VERIFIED",
            RunPhase::Done => "DONE",
            RunPhase::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip the remaining tables after the first failure
    pub fail_fast: bool,

    /// Backup directory (default: next to the database file)
    pub backup_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum TableStatus {
    Applied(ExecutionReport),
    Failed(MigrateError),

    /// Not attempted because an earlier table failed under `fail_fast`
    Skipped,
}

#[derive(Debug)]
pub struct TableOutcome {
    pub table: TableName,
    pub status: TableStatus,
}

impl TableOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, TableStatus::Failed(_))
    }
}

/// Everything a run did, for the operator.
#[derive(Debug)]
pub struct RunReport {
    pub backup: BackupOutcome,
    pub tables: Vec<TableOutcome>,
    pub verification: VerificationSummary,
    pub phase: RunPhase,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.phase == RunPhase::Done
    }

    pub fn failed_tables(&self) -> Vec<&TableName> {
        self.tables
            .iter()
            .filter(|t| t.is_failed())
            .map(|t| &t.table)
            .collect()
    }
}

/// Brings the managed tables of one database up to a [`TargetSchema`].
pub struct MigrationRunner {
    schema: TargetSchema,
    options: RunOptions,
}

impl MigrationRunner {
    pub fn new(schema: TargetSchema, options: RunOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    /// Back up the database at `path`, open it, and migrate it.
    ///
    /// A failed backup aborts before the database is opened. `:memory:`
    /// migrates a fresh in-memory database.
    pub fn run(&self, path: &Path) -> MigrateResult<RunReport> {
        log::debug!("Phase {}", RunPhase::Start);
        let backup = backup::create_backup(path, self.options.backup_dir.as_deref())?;

        let db = if path.as_os_str() == MEMORY_DB_PATH {
            MigrationDb::open_memory()?
        } else {
            MigrationDb::open(path)?
        };
        self.run_on(&db, backup)
    }

    /// Migrate an already-open database. `backup` is whatever the caller
    /// did to protect it and is carried into the report.
    pub fn run_on(&self, db: &MigrationDb, backup: BackupOutcome) -> MigrateResult<RunReport> {
        log::debug!("Phase {}", RunPhase::BackedUp);

        let mut tables = Vec::with_capacity(self.schema.tables.len());
        let mut failed = false;
        for spec in &self.schema.tables {
            if failed && self.options.fail_fast {
                log::info!("Skipping table '{}' after earlier failure", spec.name);
                tables.push(TableOutcome {
                    table: spec.name.clone(),
                    status: TableStatus::Skipped,
                });
                continue;
            }

            log::debug!("Phase {} ({})", RunPhase::Applying, spec.name);
            let status = match self.migrate_table(db, spec) {
                Ok(report) => TableStatus::Applied(report),
                Err(e) => {
                    log::warn!("Table '{}' failed: {e}", spec.name);
                    failed = true;
                    TableStatus::Failed(e)
                }
            };
            tables.push(TableOutcome {
                table: spec.name.clone(),
                status,
            });
        }

        let verification = verify::report(db.conn(), &self.schema)?;
        log::debug!("Phase {}", RunPhase::Verified);

        let phase = if failed {
            RunPhase::Failed
        } else {
            RunPhase::Done
        };
        log::debug!("Phase {phase}");
        Ok(RunReport {
            backup,
            tables,
            verification,
            phase,
        })
    }

    /// Compute every table's plan without backing up or changing anything.
    pub fn plan_only(&self, db: &MigrationDb) -> MigrateResult<Vec<TablePlan>> {
        self.schema
            .tables
            .iter()
            .map(|spec| Self::plan_table(db, spec))
            .collect()
    }

    fn plan_table(db: &MigrationDb, spec: &TableSpec) -> MigrateResult<TablePlan> {
        let live = introspect::list_columns(db.conn(), &spec.name)?;
        Ok(plan::plan(spec, &live))
    }

    fn migrate_table(&self, db: &MigrationDb, spec: &TableSpec) -> MigrateResult<ExecutionReport> {
        let plan = Self::plan_table(db, spec)?;
        execute::apply(db, &plan)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
