//! Applying a [`TablePlan`] to the database.

use crate::connection::MigrationDb;
use crate::ddl::StatementKind;
use crate::error::{MigrateError, MigrateResult};
use crate::plan::TablePlan;
use lb_core::{ColumnName, TableName};

/// What applying one table plan changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub table: TableName,
    pub created: bool,
    pub columns_added: Vec<ColumnName>,
    pub seeded_rows: usize,
    pub backfilled_rows: usize,
    pub statements_executed: usize,
}

impl ExecutionReport {
    fn unchanged(table: TableName) -> Self {
        Self {
            table,
            created: false,
            columns_added: Vec::new(),
            seeded_rows: 0,
            backfilled_rows: 0,
            statements_executed: 0,
        }
    }

    /// True when nothing was executed.
    pub fn is_noop(&self) -> bool {
        self.statements_executed == 0
    }
}

/// Apply `plan` inside a single transaction.
///
/// Any failing statement rolls back the whole table and is reported as a
/// [`MigrateError::SchemaFailure`] naming the statement kind. A failed
/// `BEGIN` or `COMMIT` is reported the same way with
/// [`StatementKind::Transaction`]. An empty plan does not open a transaction.
pub fn apply(db: &MigrationDb, plan: &TablePlan) -> MigrateResult<ExecutionReport> {
    if plan.is_empty() {
        log::debug!("Table '{}' is up to date", plan.table);
        return Ok(ExecutionReport::unchanged(plan.table.clone()));
    }

    let statements = plan.statements();
    for warning in &plan.warnings {
        log::warn!("{warning}");
    }

    db.transaction(|conn| {
        let mut report = ExecutionReport::unchanged(plan.table.clone());
        for stmt in &statements {
            log::debug!("Executing {}: {}", stmt.kind, stmt.sql);
            let failure = |e: rusqlite::Error| MigrateError::SchemaFailure {
                table: plan.table.to_string(),
                kind: stmt.kind,
                message: e.to_string(),
            };
            match stmt.kind {
                StatementKind::SeedInsert => {
                    report.seeded_rows += conn.execute(&stmt.sql, []).map_err(failure)?;
                }
                StatementKind::Backfill => {
                    report.backfilled_rows += conn.execute(&stmt.sql, []).map_err(failure)?;
                }
                _ => conn.execute_batch(&stmt.sql).map_err(failure)?,
            }
            report.statements_executed += 1;
        }
        report.created = plan.create_table;
        report.columns_added = plan.add_columns.iter().map(|c| c.name.clone()).collect();
        Ok(report)
    })
    .map_err(|e| match e {
        MigrateError::TransactionError(message) => MigrateError::SchemaFailure {
            table: plan.table.to_string(),
            kind: StatementKind::Transaction,
            message,
        },
        other => other,
    })
    .inspect(|report| {
        if report.created {
            log::info!(
                "Created table '{}' ({} columns, {} seed rows)",
                report.table,
                report.columns_added.len(),
                report.seeded_rows
            );
        } else {
            log::info!(
                "Added {} column(s) to '{}', backfilled {} row(s)",
                report.columns_added.len(),
                report.table,
                report.backfilled_rows
            );
        }
    })
}

#[cfg(test)]
#[path = "execute_test.rs"]
mod tests;
