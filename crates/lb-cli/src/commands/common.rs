//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use lb_core::config::MEMORY_DB_PATH;
use lb_core::{Config, TargetSchema};
use lb_migrate::{MigrationDb, VerificationSummary};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors (open connections) run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty: the command already printed what went wrong.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Configuration and resolved paths shared by every command.
#[derive(Debug)]
pub(crate) struct Workspace {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,

    /// Absolute database path, or `:memory:`
    pub(crate) database: PathBuf,
}

impl Workspace {
    pub(crate) fn is_memory(&self) -> bool {
        self.database.as_os_str() == MEMORY_DB_PATH
    }

    /// The target schema, restricted to `tables` when any are named.
    pub(crate) fn schema(&self, tables: Option<&str>) -> Result<TargetSchema> {
        let schema = self
            .config
            .target_schema(&self.root)
            .context("Failed to load target schema")?;
        Ok(schema.select(&parse_table_list(tables))?)
    }

    pub(crate) fn backup_dir(&self) -> Option<PathBuf> {
        if self.is_memory() {
            return None;
        }
        Some(self.config.backup_dir_absolute(&self.root, &self.database))
    }

    /// Open the database for read-only commands.
    ///
    /// A database file that does not exist yet is not created; an empty
    /// in-memory database stands in for it.
    pub(crate) fn open_for_inspection(&self) -> Result<MigrationDb> {
        if self.is_memory() || !self.database.exists() {
            log::debug!(
                "{} does not exist, inspecting an empty database",
                self.database.display()
            );
            return Ok(MigrationDb::open_memory()?);
        }
        MigrationDb::open(&self.database)
            .with_context(|| format!("Failed to open {}", self.database.display()))
    }
}

/// Load the config and resolve the database path from global CLI arguments.
pub(crate) fn load_workspace(global: &GlobalArgs) -> Result<Workspace> {
    let root = global.project_dir.clone();
    let config = match &global.config {
        Some(path) => Config::load(&root.join(path))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(&root).context("Failed to load config")?,
    };
    let database = Config::database_path_absolute(
        &config.resolve_database_path(global.database.as_deref()),
        &root,
    );
    Ok(Workspace {
        root,
        config,
        database,
    })
}

/// Split a comma-separated `--tables` value, ignoring blanks.
pub(crate) fn parse_table_list(tables: Option<&str>) -> Vec<String> {
    tables
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Print a left-aligned table with a dashed separator under the header.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}

/// Rows of the verification table, one per managed table.
pub(crate) fn verification_rows(summary: &VerificationSummary) -> Vec<Vec<String>> {
    summary
        .tables
        .iter()
        .map(|t| {
            let status = if !t.exists {
                "absent"
            } else if t.matches_expectation() {
                "ok"
            } else {
                "incomplete"
            };
            vec![
                t.table.to_string(),
                status.to_string(),
                t.row_count.to_string(),
                t.columns.len().to_string(),
                t.missing_columns
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect()
}

/// Print the verification report; with `verbose`, also every live column.
pub(crate) fn print_verification(summary: &VerificationSummary, verbose: bool) {
    print_table(
        &["TABLE", "STATUS", "ROWS", "COLUMNS", "MISSING"],
        &verification_rows(summary),
    );
    if !verbose {
        return;
    }
    for table in summary.tables.iter().filter(|t| t.exists) {
        println!();
        println!("{}:", table.table);
        for col in &table.columns {
            println!("  {} {}", col.name, col.data_type);
        }
    }
}

/// Display form of a path relative to the workspace root, when possible.
pub(crate) fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
