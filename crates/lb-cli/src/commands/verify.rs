//! Verify command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, VerifyArgs};
use crate::commands::common::{display_path, load_workspace, print_verification, ExitCode};

/// Execute the verify command
///
/// The report itself is read-only. Absent or incomplete tables still make the
/// command exit 1 so deployment scripts can gate on it.
pub(crate) fn execute(args: &VerifyArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global)?;
    let schema = ws.schema(args.tables.as_deref())?;
    let db = ws.open_for_inspection()?;

    let summary = lb_migrate::report(db.conn(), &schema).context("Verification failed")?;

    println!("Verifying {}", display_path(&ws.database, &ws.root));
    println!();
    print_verification(&summary, global.verbose);
    println!();

    if summary.all_match() {
        println!("  ✓ All managed tables are up to date");
        Ok(())
    } else {
        println!("  ✗ Some managed tables are absent or incomplete; run `lbm migrate`");
        Err(ExitCode(1).into())
    }
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
