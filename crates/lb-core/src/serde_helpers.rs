//! Serde default helpers shared by the schema and config types.

/// Serde default function that returns `true`.
///
/// Columns are nullable unless the column sets `nullable: false`.
pub fn default_true() -> bool {
    true
}
