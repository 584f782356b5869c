//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// lbm - Additive schema migrations for the lesson shop bot database
#[derive(Parser, Debug)]
#[command(name = "lbm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging, live column types)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding lessonbot.yml; relative paths resolve against it
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the database path
    #[arg(short, long, global = true, env = "LBM_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up the database, then bring every managed table up to date
    Migrate(MigrateArgs),

    /// Show the statements a migration would run, without changing anything
    Plan(PlanArgs),

    /// Report the live state of the managed tables
    Verify(VerifyArgs),

    /// Create a backup of the database file only
    Backup(BackupArgs),

    /// Normalize the keys of a localization YAML file
    Keys(KeysArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Managed tables to migrate (comma-separated, default: all)
    #[arg(short, long)]
    pub tables: Option<String>,

    /// Stop at the first table that fails
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Managed tables to plan (comma-separated, default: all)
    #[arg(short, long)]
    pub tables: Option<String>,
}

/// Arguments for the verify command
#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Managed tables to verify (comma-separated, default: all)
    #[arg(short, long)]
    pub tables: Option<String>,
}

/// Arguments for the backup command
#[derive(Args, Debug, Default)]
pub struct BackupArgs {}

/// Arguments for the keys command
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Localization file mapping keys to texts
    pub file: PathBuf,

    /// Rewrite the file with normalized keys (refused on conflicts)
    #[arg(short, long)]
    pub write: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
