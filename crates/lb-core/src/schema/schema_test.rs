use super::*;

fn simple_table(name: &str) -> TableSpec {
    TableSpec::new(name)
        .column(ColumnSpec::new("id", "INTEGER").primary_key())
        .column(ColumnSpec::new("label", "VARCHAR"))
}

#[test]
fn test_builtin_schema_parses() {
    let schema = TargetSchema::builtin().unwrap();
    let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["promocode", "systemsettings", "leadmagnet"]);
}

#[test]
fn test_builtin_promocode_has_nine_columns() {
    let schema = TargetSchema::builtin().unwrap();
    let promo = schema.table("promocode").unwrap();
    let cols: Vec<&str> = promo.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        cols,
        vec![
            "id",
            "code",
            "discount_type",
            "discount_value",
            "usage_limit",
            "usage_count",
            "is_active",
            "expires_at",
            "created_at"
        ]
    );
    let id = promo.get_column("id").unwrap();
    assert!(id.primary_key && id.auto_increment);
    let code = promo.get_column("code").unwrap();
    assert!(code.unique && !code.nullable);
    assert_eq!(
        promo.get_column("discount_type").unwrap().default,
        Some(Literal::Text("percentage".to_string()))
    );
    assert_eq!(
        promo.get_column("discount_value").unwrap().default,
        Some(Literal::Integer(0))
    );
    assert_eq!(
        promo.get_column("is_active").unwrap().default,
        Some(Literal::Bool(true))
    );
    assert_eq!(
        promo.get_column("created_at").unwrap().default_expr,
        Some(DefaultExpr::CurrentTimestamp)
    );
}

#[test]
fn test_builtin_promocode_amount_rule_declared_last() {
    let schema = TargetSchema::builtin().unwrap();
    let promo = schema.table("promocode").unwrap();
    assert_eq!(promo.backfills.len(), 2);
    assert_eq!(promo.backfills[0].source, "discount_percent");
    assert_eq!(promo.backfills[1].source, "discount_amount");
    for rule in &promo.backfills {
        assert_eq!(rule.destination, "discount_value");
        assert_eq!(rule.when, BackfillCondition::NonZero);
        assert_eq!(rule.transform, Transform::Cast);
    }
    assert_eq!(
        promo.backfills[1].set.get("discount_type"),
        Some(&Literal::Text("fixed".to_string()))
    );
}

#[test]
fn test_builtin_systemsettings_seed_row() {
    let schema = TargetSchema::builtin().unwrap();
    let settings = schema.table("systemsettings").unwrap();
    assert_eq!(settings.seed_rows.len(), 1);
    let row = &settings.seed_rows[0];
    assert_eq!(
        row.get("setting_key"),
        Some(&Literal::Text("usd_to_stars_rate".to_string()))
    );
    assert_eq!(
        row.get("setting_value"),
        Some(&Literal::Text("200".to_string()))
    );
}

#[test]
fn test_duplicate_table_rejected() {
    let err = TargetSchema::new(vec![simple_table("a"), simple_table("A")]).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateTable { .. }));
}

#[test]
fn test_duplicate_column_rejected() {
    let table = simple_table("t").column(ColumnSpec::new("LABEL", "TEXT"));
    let err = TargetSchema::new(vec![table]).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateColumn { .. }));
}

#[test]
fn test_empty_table_rejected() {
    let err = TargetSchema::new(vec![TableSpec::new("t")]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTableSpec { .. }));
}

#[test]
fn test_invalid_type_rejected() {
    let table = simple_table("t").column(ColumnSpec::new("x", "INT; DROP TABLE t"));
    let err = TargetSchema::new(vec![table]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTableSpec { .. }));
}

#[test]
fn test_two_primary_keys_rejected() {
    let table = simple_table("t").column(ColumnSpec::new("other", "INTEGER").primary_key());
    assert!(TargetSchema::new(vec![table]).is_err());
}

#[test]
fn test_auto_increment_with_default_rejected() {
    let table = TableSpec::new("t").column(
        ColumnSpec::new("id", "INTEGER")
            .primary_key()
            .auto_increment()
            .default_value(1),
    );
    assert!(TargetSchema::new(vec![table]).is_err());
}

#[test]
fn test_auto_increment_requires_integer_primary_key() {
    let not_pk = simple_table("t").column(ColumnSpec::new("seq", "INTEGER").auto_increment());
    assert!(TargetSchema::new(vec![not_pk]).is_err());

    let bigint = TableSpec::new("t").column(
        ColumnSpec::new("id", "BIGINT")
            .primary_key()
            .auto_increment(),
    );
    let err = TargetSchema::new(vec![bigint]).unwrap_err();
    assert!(err.to_string().contains("INTEGER primary key"));
}

#[test]
fn test_default_and_default_expr_rejected() {
    let table = simple_table("t").column(
        ColumnSpec::new("at", "TIMESTAMP")
            .default_value("2024-01-01")
            .default_now(),
    );
    assert!(TargetSchema::new(vec![table]).is_err());
}

#[test]
fn test_seed_row_unknown_column_rejected() {
    let table = simple_table("t").seed_row([("missing", "x")]);
    let err = TargetSchema::new(vec![table]).unwrap_err();
    assert!(matches!(err, CoreError::UnknownColumn { .. }));
}

#[test]
fn test_backfill_unknown_destination_rejected() {
    let table = simple_table("t").backfill(BackfillRule::new("legacy", "nope"));
    let err = TargetSchema::new(vec![table]).unwrap_err();
    assert!(matches!(err, CoreError::UnknownColumn { .. }));
}

#[test]
fn test_backfill_unknown_set_column_rejected() {
    let table =
        simple_table("t").backfill(BackfillRule::new("legacy", "label").set("ghost", "x"));
    let err = TargetSchema::new(vec![table]).unwrap_err();
    assert!(matches!(err, CoreError::UnknownColumn { .. }));
}

#[test]
fn test_backfill_source_may_be_undeclared() {
    let table = simple_table("t").backfill(BackfillRule::new("old_label", "label"));
    assert!(TargetSchema::new(vec![table]).is_ok());
}

#[test]
fn test_backfill_same_source_and_destination_rejected() {
    let table = simple_table("t").backfill(BackfillRule::new("label", "label"));
    assert!(TargetSchema::new(vec![table]).is_err());
}

#[test]
fn test_from_yaml_rejects_unknown_fields() {
    let yaml = r#"
tables:
  - name: t
    columns:
      - { name: id, type: INTEGER, colour: blue }
"#;
    assert!(TargetSchema::from_yaml_str(yaml).is_err());
}

#[test]
fn test_from_yaml_literal_kinds() {
    let yaml = r#"
tables:
  - name: t
    columns:
      - { name: a, type: BOOLEAN, default: false }
      - { name: b, type: INTEGER, default: 3 }
      - { name: c, type: DOUBLE, default: 1.5 }
      - { name: d, type: VARCHAR, default: "3" }
"#;
    let schema = TargetSchema::from_yaml_str(yaml).unwrap();
    let t = schema.table("t").unwrap();
    assert_eq!(t.columns[0].default, Some(Literal::Bool(false)));
    assert_eq!(t.columns[1].default, Some(Literal::Integer(3)));
    assert_eq!(t.columns[2].default, Some(Literal::Float(1.5)));
    assert_eq!(t.columns[3].default, Some(Literal::Text("3".to_string())));
    assert!(t.columns.iter().all(|c| c.nullable));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.yml");
    std::fs::write(
        &path,
        "tables:\n  - name: tickets\n    columns:\n      - { name: id, type: INTEGER }\n",
    )
    .unwrap();
    let schema = TargetSchema::load(&path).unwrap();
    assert!(schema.table("TICKETS").is_some());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TargetSchema::load(&dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}

#[test]
fn test_select_keeps_schema_order() {
    let schema = TargetSchema::builtin().unwrap();
    let picked = schema
        .select(&["leadmagnet".to_string(), "promocode".to_string()])
        .unwrap();
    let names: Vec<&str> = picked.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["promocode", "leadmagnet"]);
}

#[test]
fn test_select_empty_keeps_all() {
    let schema = TargetSchema::builtin().unwrap();
    assert_eq!(schema.select(&[]).unwrap(), schema);
}

#[test]
fn test_select_unknown_table() {
    let schema = TargetSchema::builtin().unwrap();
    let err = schema.select(&["lessons".to_string()]).unwrap_err();
    assert!(err.to_string().contains("not managed"));
}

#[test]
fn test_creation_only_constraints() {
    let col = ColumnSpec::new("code", "VARCHAR").not_null().unique();
    assert_eq!(col.creation_only_constraints(), vec!["UNIQUE", "NOT NULL"]);
    let pk = ColumnSpec::new("id", "INTEGER").primary_key().auto_increment();
    assert_eq!(pk.creation_only_constraints(), vec!["PRIMARY KEY", "auto-increment"]);
    assert!(ColumnSpec::new("x", "TEXT").creation_only_constraints().is_empty());
    let now = ColumnSpec::new("created_at", "TIMESTAMP").default_now();
    assert_eq!(now.creation_only_constraints(), vec!["DEFAULT current_timestamp"]);
}

#[test]
fn test_literal_to_sql() {
    assert_eq!(Literal::Bool(true).to_sql(), "TRUE");
    assert_eq!(Literal::Integer(-4).to_sql(), "-4");
    assert_eq!(Literal::Float(2.0).to_sql(), "2.0");
    assert_eq!(Literal::Float(0.25).to_sql(), "0.25");
    assert_eq!(Literal::Text("it's".to_string()).to_sql(), "'it''s'");
}
