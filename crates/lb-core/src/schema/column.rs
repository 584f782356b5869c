//! Column specifications and scalar literals.

use crate::identifier::ColumnName;
use crate::serde_helpers::default_true;
use crate::sql_utils::quote_literal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value used for column defaults, seed cells, and backfill constants.
///
/// Deserialized untagged, so YAML `true`, `0`, `0.5`, and `"200"` map to
/// `Bool`, `Integer`, `Float`, and `Text` respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Render the literal as SQL.
    pub fn to_sql(&self) -> String {
        match self {
            Literal::Bool(true) => "TRUE".to_string(),
            Literal::Bool(false) => "FALSE".to_string(),
            Literal::Integer(n) => n.to_string(),
            Literal::Float(f) => {
                let s = f.to_string();
                if s.contains(['.', 'e', 'E']) || !f.is_finite() {
                    s
                } else {
                    format!("{s}.0")
                }
            }
            Literal::Text(s) => quote_literal(s),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Integer(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Integer(i64::from(n))
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

/// Default expressions that are evaluated by the database at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultExpr {
    /// The row's creation time.
    CurrentTimestamp,
}

impl DefaultExpr {
    /// Render the expression as SQL.
    pub fn to_sql(self) -> &'static str {
        match self {
            DefaultExpr::CurrentTimestamp => "current_timestamp",
        }
    }
}

/// Desired definition of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    /// Column name
    pub name: ColumnName,

    /// Declared SQL type, passed through to the database
    #[serde(rename = "type")]
    pub data_type: String,

    /// Whether NULL is allowed (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Primary key column
    #[serde(default)]
    pub primary_key: bool,

    /// Rowid-backed `AUTOINCREMENT` key (INTEGER primary keys only)
    #[serde(default)]
    pub auto_increment: bool,

    /// UNIQUE constraint
    #[serde(default)]
    pub unique: bool,

    /// Literal default value
    #[serde(default)]
    pub default: Option<Literal>,

    /// Database-evaluated default expression
    #[serde(default)]
    pub default_expr: Option<DefaultExpr>,
}

impl ColumnSpec {
    /// A nullable column with no constraints and no default.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: ColumnName::new(name),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: None,
            default_expr: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Literal>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_now(mut self) -> Self {
        self.default_expr = Some(DefaultExpr::CurrentTimestamp);
        self
    }

    /// Names of the constraints that only `CREATE TABLE` can establish.
    ///
    /// `ALTER TABLE ADD COLUMN` cannot attach these to an existing table, so
    /// the planner reports them when the column has to be added later. That
    /// includes a database-evaluated default, which SQLite only accepts at
    /// creation.
    pub fn creation_only_constraints(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.primary_key {
            out.push("PRIMARY KEY");
        }
        if self.auto_increment {
            out.push("auto-increment");
        }
        if self.unique {
            out.push("UNIQUE");
        }
        if !self.nullable && !self.primary_key {
            out.push("NOT NULL");
        }
        if let Some(DefaultExpr::CurrentTimestamp) = self.default_expr {
            out.push("DEFAULT current_timestamp");
        }
        out
    }
}
