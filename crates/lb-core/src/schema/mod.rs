//! Declarative target schema for the managed tables.
//!
//! A [`TargetSchema`] is an ordered list of [`TableSpec`]s. The runner brings
//! each live table up to its spec by creating it or adding the missing
//! columns; nothing in a spec can drop or rename anything.

mod backfill;
mod column;

pub use backfill::{BackfillCondition, BackfillRule, Transform};
pub use column::{ColumnSpec, DefaultExpr, Literal};

use crate::error::{CoreError, CoreResult};
use crate::identifier::{ColumnName, TableName};
use crate::sql_utils::is_valid_type_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Built-in schema of the lesson shop bot's managed tables.
const BUILTIN_SCHEMA: &str = include_str!("builtin.yml");

/// Column values of one seed row.
pub type SeedRow = BTreeMap<ColumnName, Literal>;

/// Desired state of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    /// Table name
    pub name: TableName,

    /// Columns in creation order
    pub columns: Vec<ColumnSpec>,

    /// Rows inserted only when the table is created
    #[serde(default)]
    pub seed_rows: Vec<SeedRow>,

    /// Legacy-data backfills, in application order
    #[serde(default)]
    pub backfills: Vec<BackfillRule>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: TableName::new(name),
            columns: Vec::new(),
            seed_rows: Vec::new(),
            backfills: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    pub fn seed_row<I, K, V>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Literal>,
    {
        let row = cells
            .into_iter()
            .map(|(k, v)| (ColumnName::new(k), v.into()))
            .collect();
        self.seed_rows.push(row);
        self
    }

    pub fn backfill(mut self, rule: BackfillRule) -> Self {
        self.backfills.push(rule);
        self
    }

    /// Look up a column spec by (case-insensitive) name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name.matches(name))
    }

    fn has_column(&self, name: &ColumnName) -> bool {
        self.get_column(name.as_str()).is_some()
    }

    /// Check the table spec is internally consistent.
    pub fn validate(&self) -> CoreResult<()> {
        let table = self.name.to_string();
        let invalid = |reason: String| CoreError::InvalidTableSpec {
            table: table.clone(),
            reason,
        };

        if self.columns.is_empty() {
            return Err(invalid("a table needs at least one column".to_string()));
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.to_ascii_lowercase()) {
                return Err(CoreError::DuplicateColumn {
                    table: table.clone(),
                    column: col.name.to_string(),
                });
            }
            if !is_valid_type_name(&col.data_type) {
                return Err(invalid(format!(
                    "column '{}' has an invalid type '{}'",
                    col.name, col.data_type
                )));
            }
            if col.default.is_some() && col.default_expr.is_some() {
                return Err(invalid(format!(
                    "column '{}' sets both default and default_expr",
                    col.name
                )));
            }
            if col.auto_increment && (col.default.is_some() || col.default_expr.is_some()) {
                return Err(invalid(format!(
                    "auto-increment column '{}' cannot also declare a default",
                    col.name
                )));
            }
            if col.auto_increment
                && !(col.primary_key && col.data_type.trim().eq_ignore_ascii_case("INTEGER"))
            {
                return Err(invalid(format!(
                    "auto-increment column '{}' must be an INTEGER primary key",
                    col.name
                )));
            }
        }

        if self.columns.iter().filter(|c| c.primary_key).count() > 1 {
            return Err(invalid(
                "at most one column may be marked primary_key".to_string(),
            ));
        }

        for (i, row) in self.seed_rows.iter().enumerate() {
            if row.is_empty() {
                return Err(invalid(format!("seed row {} is empty", i + 1)));
            }
            for col in row.keys() {
                if !self.has_column(col) {
                    return Err(CoreError::UnknownColumn {
                        table: table.clone(),
                        column: col.to_string(),
                        context: format!("seed row {}", i + 1),
                    });
                }
            }
        }

        for rule in &self.backfills {
            let context = format!("backfill {} -> {}", rule.source, rule.destination);
            if !self.has_column(&rule.destination) {
                return Err(CoreError::UnknownColumn {
                    table: table.clone(),
                    column: rule.destination.to_string(),
                    context,
                });
            }
            if rule.source.matches(&rule.destination) {
                return Err(invalid(format!(
                    "{context}: source and destination are the same column"
                )));
            }
            for col in rule.set.keys() {
                if !self.has_column(col) {
                    return Err(CoreError::UnknownColumn {
                        table: table.clone(),
                        column: col.to_string(),
                        context: context.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Ordered set of managed tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSchema {
    pub tables: Vec<TableSpec>,
}

impl TargetSchema {
    /// Build and validate a schema from table specs.
    pub fn new(tables: Vec<TableSpec>) -> CoreResult<Self> {
        let schema = Self { tables };
        schema.validate()?;
        Ok(schema)
    }

    /// The embedded schema of the bot's managed tables.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_yaml_str(BUILTIN_SCHEMA)
    }

    /// Parse and validate a schema from YAML text.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let schema: TargetSchema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load a schema from a YAML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.name.to_ascii_lowercase()) {
                return Err(CoreError::DuplicateTable {
                    table: table.name.to_string(),
                });
            }
            table.validate()?;
        }
        Ok(())
    }

    /// Look up a table spec by (case-insensitive) name.
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name.matches(name))
    }

    /// Names of all managed tables, in schema order.
    pub fn table_names(&self) -> Vec<&TableName> {
        self.tables.iter().map(|t| &t.name).collect()
    }

    /// Restrict the schema to the named tables, keeping schema order.
    ///
    /// An empty selection keeps every table. Naming a table the schema does
    /// not manage is an error.
    pub fn select(&self, names: &[String]) -> CoreResult<Self> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        for name in names {
            if self.table(name).is_none() {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Table '{}' is not managed. Managed tables: {}",
                        name,
                        self.tables
                            .iter()
                            .map(|t| t.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                });
            }
        }
        let tables = self
            .tables
            .iter()
            .filter(|t| names.iter().any(|n| t.name.matches(n)))
            .cloned()
            .collect();
        Ok(Self { tables })
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
