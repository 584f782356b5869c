//! Keys command implementation

use anyhow::{Context, Result};
use lb_core::{plan_key_renames, KeyRenamePlan};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::cli::{GlobalArgs, KeysArgs};
use crate::commands::common::{load_workspace, ExitCode};

/// Execute the keys command
pub(crate) fn execute(args: &KeysArgs, global: &GlobalArgs) -> Result<()> {
    let ws = load_workspace(global)?;
    let path = ws.root.join(&args.file);
    let entries = read_texts(&path)?;
    let plan = plan_key_renames(&entries, &ws.config.text_keys.prefixes);

    print_plan(&plan);

    if plan.is_noop() {
        println!("  ✓ {} keys already normalized", entries.len());
        return Ok(());
    }
    if !args.write {
        println!();
        println!("Run with --write to rewrite {}", args.file.display());
        return Ok(());
    }
    if !plan.conflicts.is_empty() {
        eprintln!(
            "  ✗ Refusing to write {}: {} conflicting key(s) need manual review",
            args.file.display(),
            plan.conflicts.len()
        );
        return Err(ExitCode(1).into());
    }

    let yaml = serde_yaml::to_string(&plan.normalized).context("Failed to serialize texts")?;
    fs::write(&path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "  ✓ Wrote {} keys to {}",
        plan.normalized.len(),
        args.file.display()
    );
    Ok(())
}

/// Read a flat `key: text` YAML mapping.
pub(crate) fn read_texts(path: &Path) -> Result<BTreeMap<String, String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("{} is not a mapping of keys to texts", path.display()))
}

fn print_plan(plan: &KeyRenamePlan) {
    for rename in &plan.renames {
        println!("  {} -> {}", rename.from, rename.to);
    }
    for conflict in &plan.conflicts {
        println!(
            "  ✗ {}: texts differ, keeping '{}' over '{}'",
            conflict.key, conflict.kept, conflict.dropped
        );
    }
}

#[cfg(test)]
#[path = "keys_test.rs"]
mod tests;
