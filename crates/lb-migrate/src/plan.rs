//! Delta planning: what a table needs to reach its spec.
//!
//! [`plan`] is a pure function of the table spec and the live columns. It
//! only ever produces additive actions, so the live column set after applying
//! a plan is always a superset of the set before.

use crate::ddl::{self, Statement};
use crate::introspect::LiveColumn;
use lb_core::schema::{BackfillRule, ColumnSpec, SeedRow, TableSpec};
use lb_core::TableName;

/// A backfill rule together with its destination's declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBackfill {
    pub rule: BackfillRule,
    pub destination_type: String,
}

/// Planned changes for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    pub table: TableName,

    /// The table is absent and will be created.
    pub create_table: bool,

    /// Columns to add. For a created table this is every column.
    pub add_columns: Vec<ColumnSpec>,

    /// Rows inserted after creation (empty unless `create_table`).
    pub seed_rows: Vec<SeedRow>,

    /// Backfills, in application order.
    pub backfills: Vec<PlannedBackfill>,

    /// Constraints that could not be applied to added columns.
    pub warnings: Vec<String>,
}

impl TablePlan {
    fn empty(table: TableName) -> Self {
        Self {
            table,
            create_table: false,
            add_columns: Vec::new(),
            seed_rows: Vec::new(),
            backfills: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// True when the table already matches its spec.
    pub fn is_empty(&self) -> bool {
        !self.create_table && self.add_columns.is_empty() && self.backfills.is_empty()
    }

    /// Render the plan as SQL, in execution order.
    pub fn statements(&self) -> Vec<Statement> {
        if self.create_table {
            let mut stmts = vec![ddl::create_table_statement(&self.table, &self.add_columns)];
            stmts.extend(
                self.seed_rows
                    .iter()
                    .map(|row| ddl::seed_insert_statement(&self.table, row)),
            );
            return stmts;
        }

        let mut stmts = Vec::new();
        for col in &self.add_columns {
            stmts.push(ddl::add_column_statement(&self.table, col));
            stmts.extend(ddl::fill_default_statement(&self.table, col));
        }
        stmts.extend(
            self.backfills
                .iter()
                .map(|b| ddl::backfill_statement(&self.table, &b.rule, &b.destination_type)),
        );
        stmts
    }
}

fn is_live(live: &[LiveColumn], name: &str) -> bool {
    live.iter().any(|l| l.name.eq_ignore_ascii_case(name))
}

/// Compute the additive delta between `spec` and the live columns.
///
/// - No live columns: create the table with all columns and seed rows.
/// - Otherwise: add each spec column that is missing by name. Live columns
///   the table spec does not mention are left alone.
/// - A backfill is planned only if its destination is being added in this
///   plan and its source column exists live, so a rule fires at most once.
///   Rules keep declaration order; for rows matched by several rules writing
///   the same destination, the later rule's value is the one that remains.
pub fn plan(spec: &TableSpec, live: &[LiveColumn]) -> TablePlan {
    let mut plan = TablePlan::empty(spec.name.clone());

    if live.is_empty() {
        plan.create_table = true;
        plan.add_columns = spec.columns.clone();
        plan.seed_rows = spec.seed_rows.clone();
        return plan;
    }

    for col in spec.columns.iter().filter(|c| !is_live(live, &c.name)) {
        let dropped = col.creation_only_constraints();
        if !dropped.is_empty() {
            plan.warnings.push(format!(
                "column '{}.{}' is added without {} (only possible at table creation)",
                spec.name,
                col.name,
                dropped.join(", ")
            ));
        }
        plan.add_columns.push(col.clone());
    }

    for rule in &spec.backfills {
        let Some(destination) = plan
            .add_columns
            .iter()
            .find(|c| c.name.matches(&rule.destination))
        else {
            continue;
        };
        if !is_live(live, &rule.source) {
            log::debug!(
                "Skipping backfill {}.{} -> {}: source column not present",
                spec.name,
                rule.source,
                rule.destination
            );
            continue;
        }
        let planned = PlannedBackfill {
            rule: rule.clone(),
            destination_type: destination.data_type.clone(),
        };
        plan.backfills.push(planned);
    }

    plan
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
