//! Configuration types and parsing for lessonbot.yml

use crate::error::{CoreError, CoreResult};
use crate::schema::TargetSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured database path.
pub const DATABASE_ENV_VAR: &str = "LBM_DATABASE";

/// Special database path for a throwaway in-memory database.
pub const MEMORY_DB_PATH: &str = ":memory:";

const DEFAULT_DB_PATH: &str = "bot.db";

const CONFIG_FILE_NAMES: [&str; 2] = ["lessonbot.yml", "lessonbot.yaml"];

/// Migrator configuration from lessonbot.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Backup placement
    #[serde(default)]
    pub backup: BackupConfig,

    /// Path to a custom target schema YAML file (default: built-in schema)
    #[serde(default)]
    pub schema: Option<String>,

    /// Stop at the first table that fails instead of continuing
    #[serde(default)]
    pub fail_fast: bool,

    /// Localization key normalization settings
    #[serde(default)]
    pub text_keys: TextKeysConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file path (or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Backup placement configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    /// Directory for backup files (default: next to the database file)
    #[serde(default)]
    pub dir: Option<String>,
}

/// Localization key normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextKeysConfig {
    /// Removable key prefixes, tried in order
    #[serde(default = "default_text_key_prefixes")]
    pub prefixes: Vec<String>,
}

impl Default for TextKeysConfig {
    fn default() -> Self {
        Self {
            prefixes: default_text_key_prefixes(),
        }
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_text_key_prefixes() -> Vec<String> {
    vec!["text_".to_string()]
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find lessonbot.yml or lessonbot.yaml in `dir`.
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }

    /// Load configuration from a directory, falling back to defaults when no
    /// config file is present.
    ///
    /// Migrations must run with no arguments at all, so a missing file is not
    /// an error here.
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No config file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.text_keys.prefixes.iter().any(|p| p.is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "text_keys.prefixes entries cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the database path from CLI flag, LBM_DATABASE, or config.
    ///
    /// Priority: CLI flag > LBM_DATABASE env var > `database.path`
    pub fn resolve_database_path(&self, cli_database: Option<&str>) -> String {
        cli_database
            .map(String::from)
            .or_else(|| {
                std::env::var(DATABASE_ENV_VAR)
                    .ok()
                    .filter(|v| !v.is_empty())
            })
            .unwrap_or_else(|| self.database.path.clone())
    }

    /// Make a database path absolute against `root`, leaving `:memory:` alone.
    pub fn database_path_absolute(database: &str, root: &Path) -> PathBuf {
        if database == MEMORY_DB_PATH {
            PathBuf::from(MEMORY_DB_PATH)
        } else {
            root.join(database)
        }
    }

    /// Directory backups of `database_file` are written to.
    pub fn backup_dir_absolute(&self, root: &Path, database_file: &Path) -> PathBuf {
        match &self.backup.dir {
            Some(dir) => root.join(dir),
            None => database_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
        }
    }

    /// Load the target schema: the configured file, or the built-in schema.
    pub fn target_schema(&self, root: &Path) -> CoreResult<TargetSchema> {
        match &self.schema {
            Some(path) => TargetSchema::load(&root.join(path)),
            None => TargetSchema::builtin(),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
