//! CLI command implementations

pub(crate) mod backup;
pub(crate) mod common;
pub(crate) mod keys;
pub(crate) mod migrate;
pub(crate) mod plan;
pub(crate) mod verify;
