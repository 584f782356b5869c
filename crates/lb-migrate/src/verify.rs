//! Read-only verification report of the managed tables.

use crate::error::MigrateResult;
use crate::introspect::{self, LiveColumn};
use rusqlite::Connection;
use lb_core::{ColumnName, TableName, TargetSchema};

/// Final state of one managed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableVerification {
    pub table: TableName,
    pub exists: bool,

    /// Live columns in declaration order, with their live types
    pub columns: Vec<LiveColumn>,

    pub row_count: i64,

    /// Target columns that are still absent
    pub missing_columns: Vec<ColumnName>,
}

impl TableVerification {
    /// True when the table exists with every target column.
    pub fn matches_expectation(&self) -> bool {
        self.exists && self.missing_columns.is_empty()
    }
}

/// Verification of every table in a schema, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerificationSummary {
    pub tables: Vec<TableVerification>,
}

impl VerificationSummary {
    pub fn all_match(&self) -> bool {
        self.tables.iter().all(TableVerification::matches_expectation)
    }

    pub fn table(&self, name: &str) -> Option<&TableVerification> {
        self.tables.iter().find(|t| t.table.matches(name))
    }
}

/// Re-introspect every managed table. Never mutates the database.
pub fn report(conn: &Connection, schema: &TargetSchema) -> MigrateResult<VerificationSummary> {
    let mut tables = Vec::with_capacity(schema.tables.len());
    for spec in &schema.tables {
        let columns = introspect::list_columns(conn, &spec.name)?;
        let exists = !columns.is_empty();
        let row_count = if exists {
            introspect::row_count(conn, &spec.name)?
        } else {
            0
        };
        let missing_columns = spec
            .columns
            .iter()
            .filter(|c| !columns.iter().any(|l| c.name.matches(&l.name)))
            .map(|c| c.name.clone())
            .collect();

        log::debug!(
            "Verified '{}': {} columns, {} rows",
            spec.name,
            columns.len(),
            row_count
        );
        tables.push(TableVerification {
            table: spec.name.clone(),
            exists,
            columns,
            row_count,
            missing_columns,
        });
    }
    Ok(VerificationSummary { tables })
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
