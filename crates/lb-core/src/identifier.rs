//! Strongly-typed table and column names.

use crate::newtype_string::define_identifier;

define_identifier! {
    /// Name of a managed table.
    ///
    /// Prevents accidental mixing of table names with column names or
    /// arbitrary SQL fragments.
    pub struct TableName;
}

define_identifier! {
    /// Name of a column within a managed table.
    pub struct ColumnName;
}
