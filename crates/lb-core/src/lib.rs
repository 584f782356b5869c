//! lb-core - Core library for the lessonbot migrator
//!
//! This crate provides the configuration file, the declarative target schema
//! of the bot's managed tables, validated SQL identifiers, quoting helpers,
//! checksums, and localization key normalization used across all migrator
//! components.

pub mod checksum;
pub mod config;
pub mod error;
pub mod identifier;
mod newtype_string;
pub mod schema;
pub(crate) mod serde_helpers;
pub mod sql_utils;
pub mod text_keys;

pub use checksum::{compute_checksum, file_checksum};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use identifier::{ColumnName, TableName};
pub use schema::{
    BackfillCondition, BackfillRule, ColumnSpec, DefaultExpr, Literal, SeedRow, TableSpec,
    TargetSchema, Transform,
};
pub use text_keys::{normalize_key, plan_key_renames, KeyRenamePlan, TextCatalog};
