//! One-time data backfills from legacy columns.

use super::column::Literal;
use crate::identifier::ColumnName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the source value is carried into the destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Cast to the destination's declared type (default)
    #[default]
    Cast,
    /// Assign the raw source value
    Copy,
}

/// Which legacy rows a backfill touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackfillCondition {
    /// Rows where the source is not NULL (default)
    #[default]
    NotNull,
    /// Rows where the source is neither NULL nor zero. Legacy numeric columns
    /// often default to 0 to mean "unset".
    NonZero,
}

/// Copy values from a legacy column into a newly introduced one.
///
/// A rule fires only in the run that adds `destination`, and only if
/// `source` exists in the live table. Rules run in declaration order, so when
/// several rules write the same destination the later one wins for rows both
/// match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackfillRule {
    /// Legacy column to read from
    pub source: ColumnName,

    /// Newly added column to write to
    pub destination: ColumnName,

    #[serde(default)]
    pub transform: Transform,

    #[serde(default)]
    pub when: BackfillCondition,

    /// Constant assignments applied to the same rows
    #[serde(default)]
    pub set: BTreeMap<ColumnName, Literal>,
}

impl BackfillRule {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: ColumnName::new(source),
            destination: ColumnName::new(destination),
            transform: Transform::default(),
            when: BackfillCondition::default(),
            set: BTreeMap::new(),
        }
    }

    pub fn when(mut self, when: BackfillCondition) -> Self {
        self.when = when;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.set.insert(ColumnName::new(column), value.into());
        self
    }
}
