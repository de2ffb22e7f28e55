//! Identifier types for records and mentor groups

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, unique key of a mentor or mentee record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        RecordKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        RecordKey(s)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        RecordKey(s.to_string())
    }
}

/// Positional keys, for tables without an explicit id column.
impl From<usize> for RecordKey {
    fn from(position: usize) -> Self {
        RecordKey(position.to_string())
    }
}

/// Identifier of a mentor group (0-based, assigned by the clustering solver)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GroupId(pub usize);

impl GroupId {
    pub fn new(id: usize) -> Self {
        GroupId(id)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

impl From<usize> for GroupId {
    fn from(id: usize) -> Self {
        GroupId(id)
    }
}
