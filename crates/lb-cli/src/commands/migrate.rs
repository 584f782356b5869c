//! Migrate command implementation

use anyhow::Result;
use lb_migrate::{
    BackupOutcome, MigrateError, MigrationRunner, RunOptions, RunReport, TableOutcome,
    TableStatus,
};
use std::path::Path;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{display_path, load_workspace, print_verification, ExitCode};

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global)?;
    let schema = ws.schema(args.tables.as_deref())?;
    let options = RunOptions {
        fail_fast: args.fail_fast || ws.config.fail_fast,
        backup_dir: ws.backup_dir(),
    };

    println!("Migrating {}", display_path(&ws.database, &ws.root));
    let report = match MigrationRunner::new(schema, options).run(&ws.database) {
        Ok(report) => report,
        Err(err) => {
            let context = abort_context(&err);
            if let MigrateError::BackupFailed { .. } = err {
                println!("  ✗ Backup failed");
            }
            return Err(anyhow::Error::new(err).context(context));
        }
    };

    println!("{}", backup_line(&report.backup, &ws.root));
    println!();
    for outcome in &report.tables {
        println!("{}", outcome_line(outcome));
    }
    println!();
    print_verification(&report.verification, global.verbose);
    println!();

    print_summary(&report)
}

/// Context for a run that returned an error instead of a report.
///
/// Backup and connection errors happen before the first statement; anything
/// later may follow committed tables.
pub(crate) fn abort_context(err: &MigrateError) -> &'static str {
    match err {
        MigrateError::BackupFailed { .. } | MigrateError::ConnectionError(_) => {
            "Migration aborted before any change was made"
        }
        _ => "Migration stopped after applying changes; run `lbm verify` to inspect the database",
    }
}

pub(crate) fn backup_line(backup: &BackupOutcome, root: &Path) -> String {
    match backup {
        BackupOutcome::Created(artifact) => {
            format!("  ✓ Backup: {}", display_path(&artifact.path, root))
        }
        BackupOutcome::NoPriorDatabase => "  ✓ No existing database, creating a new one".to_string(),
        BackupOutcome::InMemory => "  ✓ In-memory database, no backup needed".to_string(),
    }
}

/// One progress line per table.
pub(crate) fn outcome_line(outcome: &TableOutcome) -> String {
    let table = &outcome.table;
    match &outcome.status {
        TableStatus::Applied(r) if r.is_noop() => format!("  ✓ {table} (up to date)"),
        TableStatus::Applied(r) if r.created => format!(
            "  ✓ {table} - created with {} columns, {} seed row(s)",
            r.columns_added.len(),
            r.seeded_rows
        ),
        TableStatus::Applied(r) => {
            let added: Vec<&str> = r.columns_added.iter().map(|c| c.as_str()).collect();
            let mut line = format!("  ✓ {table} - added {}", added.join(", "));
            if r.backfilled_rows > 0 {
                line.push_str(&format!(" (backfilled {} row(s))", r.backfilled_rows));
            }
            line
        }
        TableStatus::Failed(e) => format!("  ✗ {table} - {e}"),
        TableStatus::Skipped => format!("  - {table} (skipped)"),
    }
}

fn print_summary(report: &RunReport) -> Result<()> {
    if report.is_success() {
        println!("Migration complete");
        return Ok(());
    }

    let failed: Vec<&str> = report
        .failed_tables()
        .into_iter()
        .map(|t| t.as_str())
        .collect();
    eprintln!("Migration failed for: {}", failed.join(", "));
    if let Some(artifact) = report.backup.artifact() {
        eprintln!(
            "The database before this run is saved at {}",
            artifact.path.display()
        );
    }
    eprintln!("Consult the logs (RUST_LOG=debug or -v) or contact support.");
    Err(ExitCode(1).into())
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
