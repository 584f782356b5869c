use super::*;
use crate::MigrationDb;

fn schema() -> TargetSchema {
    TargetSchema::builtin().unwrap()
}

#[test]
fn test_empty_database_reports_absent_tables() {
    let db = MigrationDb::open_memory().unwrap();
    let summary = report(db.conn(), &schema()).unwrap();

    assert_eq!(summary.tables.len(), 3);
    assert!(!summary.all_match());
    let promocode = summary.table("promocode").unwrap();
    assert!(!promocode.exists);
    assert_eq!(promocode.row_count, 0);
    assert_eq!(promocode.missing_columns.len(), 9);
}

#[test]
fn test_partial_table_lists_missing_columns() {
    let db = MigrationDb::open_memory().unwrap();
    db.conn()
        .execute_batch(
            "CREATE TABLE leadmagnet (id INTEGER, is_enabled BOOLEAN, notes TEXT);
             INSERT INTO leadmagnet VALUES (1, true, 'x');",
        )
        .unwrap();

    let summary = report(db.conn(), &schema()).unwrap();
    let lead = summary.table("leadmagnet").unwrap();
    assert!(lead.exists);
    assert!(!lead.matches_expectation());
    assert_eq!(lead.row_count, 1);
    assert_eq!(lead.columns.len(), 3);
    assert_eq!(
        lead.missing_columns,
        vec!["greeting_text", "lessons_label", "updated_at"]
    );
}

#[test]
fn test_report_does_not_mutate() {
    let db = MigrationDb::open_memory().unwrap();
    report(db.conn(), &schema()).unwrap();
    let tables: i64 = db
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn test_complete_table_matches() {
    let db = MigrationDb::open_memory().unwrap();
    db.conn()
        .execute_batch(
            "CREATE TABLE systemsettings (
                ID INTEGER,
                Setting_Key VARCHAR,
                setting_value TEXT,
                updated_at TIMESTAMP,
                extra INTEGER
            )",
        )
        .unwrap();
    let summary = report(db.conn(), &schema()).unwrap();
    let settings = summary.table("SystemSettings").unwrap();
    assert!(settings.matches_expectation());
    assert_eq!(settings.row_count, 0);
}
