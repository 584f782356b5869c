//! SQL rendering for planned schema changes.
//!
//! Every identifier is quoted and every literal escaped; table and column
//! names are already validated identifiers by the time they get here.

use lb_core::schema::{BackfillCondition, BackfillRule, ColumnSpec, SeedRow, Transform};
use lb_core::sql_utils::quote_ident;
use lb_core::TableName;
use std::fmt;

/// The kind of statement, reported when a statement fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable,
    AddColumn,
    FillDefault,
    SeedInsert,
    Backfill,
    /// The table's `BEGIN` or `COMMIT` itself.
    Transaction,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::CreateTable => write!(f, "CREATE TABLE"),
            StatementKind::AddColumn => write!(f, "ALTER TABLE ADD COLUMN"),
            StatementKind::FillDefault => write!(f, "default UPDATE"),
            StatementKind::SeedInsert => write!(f, "seed INSERT"),
            StatementKind::Backfill => write!(f, "backfill UPDATE"),
            StatementKind::Transaction => write!(f, "transaction"),
        }
    }
}

/// One rendered SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
}

impl Statement {
    fn new(kind: StatementKind, sql: String) -> Self {
        Self { kind, sql }
    }
}

/// Full column definition for `CREATE TABLE`.
pub fn column_definition(col: &ColumnSpec) -> String {
    let mut def = format!("{} {}", quote_ident(&col.name), col.data_type.trim());
    if col.primary_key {
        def.push_str(" PRIMARY KEY");
        if col.auto_increment {
            def.push_str(" AUTOINCREMENT");
        }
    } else {
        if !col.nullable {
            def.push_str(" NOT NULL");
        }
        if col.unique {
            def.push_str(" UNIQUE");
        }
    }
    if let Some(value) = &col.default {
        def.push_str(" DEFAULT ");
        def.push_str(&value.to_sql());
    } else if let Some(expr) = col.default_expr {
        def.push_str(" DEFAULT ");
        def.push_str(expr.to_sql());
    }
    def
}

/// Column definition for `ALTER TABLE ADD COLUMN`: type and literal default.
///
/// SQLite rejects non-constant defaults on added columns, so a
/// `default_expr` is left out here and covered by [`fill_default_statement`].
pub fn add_column_definition(col: &ColumnSpec) -> String {
    let mut def = format!("{} {}", quote_ident(&col.name), col.data_type.trim());
    if let Some(value) = &col.default {
        def.push_str(" DEFAULT ");
        def.push_str(&value.to_sql());
    }
    def
}

/// `CREATE TABLE` with every column and its constraints.
pub fn create_table_statement(table: &TableName, columns: &[ColumnSpec]) -> Statement {
    let defs: Vec<String> = columns.iter().map(column_definition).collect();
    Statement::new(
        StatementKind::CreateTable,
        format!(
            "CREATE TABLE {} (\n    {}\n)",
            quote_ident(table),
            defs.join(",\n    ")
        ),
    )
}

/// `ALTER TABLE ... ADD COLUMN` for one missing column.
pub fn add_column_statement(table: &TableName, col: &ColumnSpec) -> Statement {
    Statement::new(
        StatementKind::AddColumn,
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            quote_ident(table),
            add_column_definition(col)
        ),
    )
}

/// `UPDATE` giving existing rows the value of an added column's
/// `default_expr`, which the column itself could not carry.
pub fn fill_default_statement(table: &TableName, col: &ColumnSpec) -> Option<Statement> {
    let expr = col.default_expr?;
    let column = quote_ident(&col.name);
    Some(Statement::new(
        StatementKind::FillDefault,
        format!(
            "UPDATE {} SET {column} = {} WHERE {column} IS NULL",
            quote_ident(table),
            expr.to_sql()
        ),
    ))
}

/// `INSERT` for one seed row.
pub fn seed_insert_statement(table: &TableName, row: &SeedRow) -> Statement {
    let columns: Vec<String> = row.keys().map(|c| quote_ident(c)).collect();
    let values: Vec<String> = row.values().map(|v| v.to_sql()).collect();
    Statement::new(
        StatementKind::SeedInsert,
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns.join(", "),
            values.join(", ")
        ),
    )
}

/// `UPDATE` that carries legacy values into the destination column.
///
/// `destination_type` is the destination's declared type, used by
/// [`Transform::Cast`].
pub fn backfill_statement(
    table: &TableName,
    rule: &BackfillRule,
    destination_type: &str,
) -> Statement {
    let source = quote_ident(&rule.source);
    let value = match rule.transform {
        Transform::Copy => source.clone(),
        Transform::Cast => format!("CAST({source} AS {})", destination_type.trim()),
    };

    let mut assignments = vec![format!("{} = {value}", quote_ident(&rule.destination))];
    assignments.extend(
        rule.set
            .iter()
            .filter(|(col, _)| !col.matches(&rule.destination))
            .map(|(col, v)| format!("{} = {}", quote_ident(col), v.to_sql())),
    );

    let condition = match rule.when {
        BackfillCondition::NotNull => format!("{source} IS NOT NULL"),
        BackfillCondition::NonZero => format!("{source} IS NOT NULL AND {source} <> 0"),
    };

    Statement::new(
        StatementKind::Backfill,
        format!(
            "UPDATE {} SET {} WHERE {condition}",
            quote_ident(table),
            assignments.join(", ")
        ),
    )
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
