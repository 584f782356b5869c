//! SQL identifier quoting and literal rendering utilities
//!
//! Provides safe quoting for SQL identifiers and string literals used when
//! constructing DDL and backfill statements.

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use lb_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("promocode"), r#""promocode""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a single-quoted SQL string literal.
///
/// # Examples
/// ```
/// use lb_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

/// Check that a declared column type is made of type-name characters only.
///
/// Accepts names like `VARCHAR`, `DECIMAL(10, 2)`, or `TIMESTAMP WITH TIME ZONE`.
/// Whether the database knows the type is for the database to decide.
pub fn is_valid_type_name(data_type: &str) -> bool {
    let trimmed = data_type.trim();
    !trimmed.is_empty()
        && trimmed.starts_with(|c: char| c.is_ascii_alphabetic())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '(' | ')' | ','))
}
