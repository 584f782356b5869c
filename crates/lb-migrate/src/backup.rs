//! Pre-migration backup of the database file.
//!
//! A backup is a byte-identical copy of the database file (and its
//! write-ahead log, if one exists) taken before the first statement runs.
//! Backups are never deleted or restored automatically.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, Utc};
use lb_core::config::MEMORY_DB_PATH;
use lb_core::file_checksum;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A backup written by [`create_backup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifact {
    /// The database file that was copied
    pub original: PathBuf,

    /// Where the copy was written
    pub path: PathBuf,

    /// Copy of the write-ahead log, when the database had one
    pub wal_path: Option<PathBuf>,

    pub created_at: DateTime<Utc>,

    /// SHA-256 of both the original and the copy
    pub checksum: String,

    pub size_bytes: u64,
}

/// Result of a backup attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created(BackupArtifact),

    /// There is no database file yet, so there is nothing to protect.
    NoPriorDatabase,

    /// In-memory databases have no file to copy.
    InMemory,
}

impl BackupOutcome {
    pub fn artifact(&self) -> Option<&BackupArtifact> {
        match self {
            BackupOutcome::Created(artifact) => Some(artifact),
            _ => None,
        }
    }
}

/// `<file name>.backup_<YYYYMMDD_HHMMSS>` for `database` at time `at`.
pub fn backup_file_name(database: &Path, at: DateTime<Utc>) -> String {
    let file_name = database
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "database".to_string());
    format!("{file_name}.backup_{}", at.format(BACKUP_TIMESTAMP_FORMAT))
}

/// Full path of the backup of `database` at time `at`.
///
/// Lands in `dir` when given, otherwise next to the database.
pub fn backup_path(database: &Path, dir: Option<&Path>, at: DateTime<Utc>) -> PathBuf {
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| database.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(backup_file_name(database, at))
}

/// SQLite keeps the write-ahead log next to the file as `<name>-wal`.
fn wal_path_of(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push("-wal");
    PathBuf::from(os)
}

/// Back up `database` with the current UTC time.
pub fn create_backup(database: &Path, dir: Option<&Path>) -> MigrateResult<BackupOutcome> {
    create_backup_at(database, dir, Utc::now())
}

/// Back up `database` as of time `at`.
///
/// An existing backup with the same name is never overwritten; the attempt
/// fails instead.
pub fn create_backup_at(
    database: &Path,
    dir: Option<&Path>,
    at: DateTime<Utc>,
) -> MigrateResult<BackupOutcome> {
    if database.as_os_str() == MEMORY_DB_PATH {
        log::debug!("In-memory database, skipping backup");
        return Ok(BackupOutcome::InMemory);
    }
    if !database.exists() {
        log::info!(
            "No database at {}, nothing to back up",
            database.display()
        );
        return Ok(BackupOutcome::NoPriorDatabase);
    }

    if let Some(dir) = dir {
        std::fs::create_dir_all(dir).map_err(|e| MigrateError::backup(dir, e))?;
    }

    let path = backup_path(database, dir, at);
    let size_bytes = copy_new(database, &path)?;

    let source_wal = wal_path_of(database);
    let wal_path = if source_wal.exists() {
        let target = wal_path_of(&path);
        copy_new(&source_wal, &target)?;
        Some(target)
    } else {
        None
    };

    let original_sum = file_checksum(database).map_err(|e| MigrateError::backup(database, e))?;
    let backup_sum = file_checksum(&path).map_err(|e| MigrateError::backup(&path, e))?;
    if original_sum != backup_sum {
        return Err(MigrateError::backup(
            &path,
            format!("checksum mismatch ({original_sum} != {backup_sum})"),
        ));
    }

    log::info!(
        "Backed up {} to {} ({size_bytes} bytes)",
        database.display(),
        path.display()
    );
    Ok(BackupOutcome::Created(BackupArtifact {
        original: database.to_path_buf(),
        path,
        wal_path,
        created_at: at,
        checksum: original_sum,
        size_bytes,
    }))
}

/// Copy `from` to a file that must not exist yet.
fn copy_new(from: &Path, to: &Path) -> MigrateResult<u64> {
    let mut source = File::open(from).map_err(|e| MigrateError::backup(from, e))?;
    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => MigrateError::backup(to, "backup file already exists"),
            _ => MigrateError::backup(to, e),
        })?;
    let bytes = io::copy(&mut source, &mut target).map_err(|e| MigrateError::backup(to, e))?;
    target.sync_all().map_err(|e| MigrateError::backup(to, e))?;
    Ok(bytes)
}

#[cfg(test)]
#[path = "backup_test.rs"]
mod tests;
