//! Plan command implementation

use anyhow::{Context, Result};
use lb_migrate::{MigrationRunner, RunOptions, TablePlan};

use crate::cli::{GlobalArgs, PlanArgs};
use crate::commands::common::{display_path, load_workspace};

/// Execute the plan command
pub(crate) fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global)?;
    let schema = ws.schema(args.tables.as_deref())?;
    let db = ws.open_for_inspection()?;

    let plans = MigrationRunner::new(schema, RunOptions::default())
        .plan_only(&db)
        .context("Failed to plan migration")?;

    println!("Plan for {}", display_path(&ws.database, &ws.root));
    println!();
    for plan in &plans {
        for line in plan_lines(plan) {
            println!("{line}");
        }
    }

    let pending = plans.iter().filter(|p| !p.is_empty()).count();
    println!();
    if pending == 0 {
        println!("Nothing to do");
    } else {
        println!("{pending} table(s) to migrate");
    }
    Ok(())
}

/// Printable lines for one table's plan.
pub(crate) fn plan_lines(plan: &TablePlan) -> Vec<String> {
    if plan.is_empty() {
        return vec![format!("{}: up to date", plan.table)];
    }

    let action = if plan.create_table { "create" } else { "alter" };
    let mut lines = vec![format!("{} ({action}):", plan.table)];
    for warning in &plan.warnings {
        lines.push(format!("  ! {warning}"));
    }
    for stmt in plan.statements() {
        lines.push(format!("  -- {}", stmt.kind));
        lines.extend(stmt.sql.lines().map(|l| format!("  {l}")));
        if let Some(last) = lines.last_mut() {
            last.push(';');
        }
    }
    lines
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
