use super::*;
use lb_core::{ColumnName, TableName};
use lb_migrate::introspect::table_exists;
use lb_migrate::{BackupArtifact, ExecutionReport, MigrateError, MigrationDb};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn global_for(dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.to_path_buf(),
        config: None,
        database: Some("bot.db".to_string()),
    }
}

fn applied(created: bool, columns: &[&str], backfilled: usize) -> TableOutcome {
    TableOutcome {
        table: TableName::new("promocode"),
        status: TableStatus::Applied(ExecutionReport {
            table: TableName::new("promocode"),
            created,
            columns_added: columns.iter().map(|c| ColumnName::new(*c)).collect(),
            seeded_rows: 0,
            backfilled_rows: backfilled,
            statements_executed: columns.len() + usize::from(backfilled > 0),
        }),
    }
}

#[test]
fn test_migrate_creates_fresh_database() {
    let temp_dir = tempdir().unwrap();
    execute(&MigrateArgs::default(), &global_for(temp_dir.path())).unwrap();

    let db = MigrationDb::open(&temp_dir.path().join("bot.db")).unwrap();
    for table in ["promocode", "systemsettings", "leadmagnet"] {
        assert!(table_exists(db.conn(), table).unwrap(), "{table} missing");
    }
}

#[test]
fn test_migrate_selected_tables_only() {
    let temp_dir = tempdir().unwrap();
    let args = MigrateArgs {
        tables: Some("leadmagnet".to_string()),
        fail_fast: false,
    };
    execute(&args, &global_for(temp_dir.path())).unwrap();

    let db = MigrationDb::open(&temp_dir.path().join("bot.db")).unwrap();
    assert!(table_exists(db.conn(), "leadmagnet").unwrap());
    assert!(!table_exists(db.conn(), "promocode").unwrap());
}

#[test]
fn test_migrate_failure_exits_non_zero() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join("schema.yml"),
        "tables:
  - name: broken
    columns:
      - { name: id, type: INTEGER }
      - { name: title, type: TEXT, nullable: false }
    seed_rows:
      - { id: 1 }
",
    )
    .unwrap();
    fs::write(temp_dir.path().join("lessonbot.yml"), "schema: schema.yml\n").unwrap();

    let err = execute(&MigrateArgs::default(), &global_for(temp_dir.path())).unwrap_err();
    assert!(matches!(err.downcast_ref::<ExitCode>(), Some(ExitCode(1))));
}

#[test]
fn test_outcome_lines() {
    assert_eq!(
        outcome_line(&applied(false, &[], 0)),
        "  ✓ promocode (up to date)"
    );
    assert_eq!(
        outcome_line(&applied(true, &["id", "code"], 0)),
        "  ✓ promocode - created with 2 columns, 0 seed row(s)"
    );
    assert_eq!(
        outcome_line(&applied(false, &["discount_type", "discount_value"], 3)),
        "  ✓ promocode - added discount_type, discount_value (backfilled 3 row(s))"
    );

    let failed = TableOutcome {
        table: TableName::new("leadmagnet"),
        status: TableStatus::Failed(MigrateError::TransactionError("boom".to_string())),
    };
    assert_eq!(
        outcome_line(&failed),
        "  ✗ leadmagnet - [M005] Transaction failed: boom"
    );

    let skipped = TableOutcome {
        table: TableName::new("leadmagnet"),
        status: TableStatus::Skipped,
    };
    assert_eq!(outcome_line(&skipped), "  - leadmagnet (skipped)");
}

#[test]
fn test_backup_line_marks_every_outcome() {
    let root = Path::new("/srv/bot");
    let artifact = BackupArtifact {
        original: root.join("bot.db"),
        path: root.join("bot.db.backup_20260102_030405"),
        wal_path: None,
        created_at: chrono::Utc::now(),
        checksum: "abc".to_string(),
        size_bytes: 3,
    };
    assert_eq!(
        backup_line(&BackupOutcome::Created(artifact), root),
        "  ✓ Backup: bot.db.backup_20260102_030405"
    );
    assert!(backup_line(&BackupOutcome::NoPriorDatabase, root).starts_with("  ✓ "));
    assert!(backup_line(&BackupOutcome::InMemory, root).starts_with("  ✓ "));
}

#[test]
fn test_abort_context_depends_on_failure_point() {
    let backup = MigrateError::BackupFailed {
        path: "bot.db".to_string(),
        message: "disk full".to_string(),
    };
    assert_eq!(
        abort_context(&backup),
        "Migration aborted before any change was made"
    );
    let connection = MigrateError::ConnectionError("locked".to_string());
    assert_eq!(abort_context(&connection), abort_context(&backup));

    let verification = MigrateError::IntrospectionError {
        table: "promocode".to_string(),
        message: "disk I/O error".to_string(),
    };
    assert!(abort_context(&verification).contains("after applying changes"));
}

#[test]
fn test_backup_failure_reports_no_change() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("bot.db"), b"").unwrap();
    fs::write(temp_dir.path().join("backups"), b"not a directory").unwrap();
    fs::write(temp_dir.path().join("lessonbot.yml"), "backup:\n  dir: backups\n").unwrap();

    let err = execute(&MigrateArgs::default(), &global_for(temp_dir.path())).unwrap_err();
    assert!(err.downcast_ref::<ExitCode>().is_none());
    assert_eq!(err.to_string(), "Migration aborted before any change was made");
}
