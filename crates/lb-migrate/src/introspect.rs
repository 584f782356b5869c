//! Live schema introspection.
//!
//! The runner keeps no schema-version record, so what these functions
//! return is the only source of truth about the current state.

use crate::error::{MigrateError, MigrateResult};
use lb_core::sql_utils::quote_ident;
use rusqlite::{Connection, OptionalExtension};

/// One column as the database currently declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveColumn {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default: Option<String>,
    pub primary_key: bool,
}

/// Return the table's live name (as stored in the catalog) if it exists.
///
/// Matching is case-insensitive, like unquoted identifiers.
pub fn find_table(conn: &Connection, table: &str) -> MigrateResult<Option<String>> {
    conn.query_row(
        "SELECT name FROM main.sqlite_master \
         WHERE type = 'table' AND lower(name) = lower(?1) \
         ORDER BY name LIMIT 1",
        [table],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| introspection_error(table, e))
}

/// Check whether a table exists.
pub fn table_exists(conn: &Connection, table: &str) -> MigrateResult<bool> {
    Ok(find_table(conn, table)?.is_some())
}

/// List the table's columns in declaration order.
///
/// A missing table yields an empty list, not an error: "absent" means
/// "create it".
pub fn list_columns(conn: &Connection, table: &str) -> MigrateResult<Vec<LiveColumn>> {
    let Some(live_name) = find_table(conn, table)? else {
        log::debug!("Table '{table}' does not exist yet");
        return Ok(Vec::new());
    };

    let mut stmt = conn
        .prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?1, 'main') ORDER BY cid",
        )
        .map_err(|e| introspection_error(table, e))?;
    let columns = stmt
        .query_map([live_name.as_str()], |row| {
            Ok(LiveColumn {
                name: row.get(0)?,
                data_type: row.get(1)?,
                not_null: row.get(2)?,
                default: row.get(3)?,
                primary_key: row.get(4)?,
            })
        })
        .map_err(|e| introspection_error(table, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| introspection_error(table, e))?;
    Ok(columns)
}

/// Count the rows of an existing table.
pub fn row_count(conn: &Connection, table: &str) -> MigrateResult<i64> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
        [],
        |row| row.get(0),
    )
    .map_err(|e| introspection_error(table, e))
}

fn introspection_error(table: &str, e: rusqlite::Error) -> MigrateError {
    MigrateError::IntrospectionError {
        table: table.to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
#[path = "introspect_test.rs"]
mod tests;
