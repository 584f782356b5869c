//! Integration tests that run the `lbm` binary.

use std::path::Path;
use std::process::Command;

fn lbm_bin() -> String {
    env!("CARGO_BIN_EXE_lbm").to_string()
}

/// Run `lbm` in `dir` and return (stdout, stderr, success).
fn run_lbm(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(lbm_bin())
        .args(["--project-dir", dir.to_str().unwrap()])
        .args(args)
        .env_remove("LBM_DATABASE")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute lbm with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_migrate_then_verify() {
    let tmp = tempfile::tempdir().unwrap();

    let (stdout, stderr, ok) = run_lbm(tmp.path(), &["verify"]);
    assert!(!ok, "verify should fail before migrating: {stdout}{stderr}");
    assert!(!tmp.path().join("bot.db").exists());

    let (stdout, stderr, ok) = run_lbm(tmp.path(), &["migrate"]);
    assert!(ok, "migrate failed: {stdout}{stderr}");
    assert!(stdout.contains("✓ promocode - created"), "{stdout}");
    assert!(stdout.contains("Migration complete"), "{stdout}");

    let (stdout, stderr, ok) = run_lbm(tmp.path(), &["verify"]);
    assert!(ok, "verify failed: {stdout}{stderr}");

    let (stdout, _, ok) = run_lbm(tmp.path(), &["plan"]);
    assert!(ok);
    assert!(stdout.contains("Nothing to do"), "{stdout}");
}

#[test]
fn test_migrate_backs_up_existing_database() {
    let tmp = tempfile::tempdir().unwrap();
    let (_, _, ok) = run_lbm(tmp.path(), &["migrate", "--tables", "leadmagnet"]);
    assert!(ok);

    let (stdout, stderr, ok) = run_lbm(tmp.path(), &["migrate"]);
    assert!(ok, "second migrate failed: {stdout}{stderr}");
    assert!(stdout.contains("✓ Backup: bot.db.backup_"), "{stdout}");
    assert!(stdout.contains("✓ leadmagnet (up to date)"), "{stdout}");
}

#[test]
fn test_unknown_table_fails_with_support_hint() {
    let tmp = tempfile::tempdir().unwrap();
    let (_, stderr, ok) = run_lbm(tmp.path(), &["migrate", "--tables", "orders"]);
    assert!(!ok);
    assert!(stderr.contains("not managed"), "{stderr}");
    assert!(stderr.contains("contact support"), "{stderr}");
}
