//! Backup command implementation

use anyhow::{Context, Result};
use lb_migrate::{create_backup, BackupOutcome};

use crate::cli::{BackupArgs, GlobalArgs};
use crate::commands::common::{display_path, load_workspace};

/// Execute the backup command
pub(crate) fn execute(_args: &BackupArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global)?;
    let outcome = create_backup(&ws.database, ws.backup_dir().as_deref())
        .context("Backup failed")?;

    match outcome {
        BackupOutcome::Created(artifact) => {
            println!(
                "  ✓ Backed up {} to {}",
                display_path(&artifact.original, &ws.root),
                display_path(&artifact.path, &ws.root)
            );
            if let Some(wal) = &artifact.wal_path {
                println!("    with write-ahead log {}", display_path(wal, &ws.root));
            }
            println!(
                "    {} bytes, sha256 {}",
                artifact.size_bytes, artifact.checksum
            );
        }
        BackupOutcome::NoPriorDatabase => {
            println!(
                "  No database at {}, nothing to back up",
                display_path(&ws.database, &ws.root)
            );
        }
        BackupOutcome::InMemory => println!("  In-memory database, nothing to back up"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "backup_test.rs"]
mod tests;
