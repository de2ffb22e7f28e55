//! Records and ordered record tables
//!
//! A table is the in-memory form of one side of the matching problem (the
//! mentor pool or the mentee pool). Rows keep their insertion order, which is
//! also the index space handed to the solvers.

use super::types::RecordKey;
use super::value::{AttributeMap, AttributeValue};
use crate::error::{MatchError, MatchResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One mentor or mentee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: RecordKey,
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl Record {
    pub fn new(key: impl Into<RecordKey>) -> Self {
        Self {
            key: key.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Insertion-ordered collection of records with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: IndexMap<RecordKey, Record>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting duplicate keys.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> MatchResult<Self> {
        let mut table = Self::new();
        for record in records {
            table.insert(record)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, record: Record) -> MatchResult<()> {
        if self.records.contains_key(&record.key) {
            return Err(MatchError::DuplicateRecord(record.key));
        }
        self.records.insert(record.key.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &RecordKey) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &RecordKey) -> bool {
        self.records.contains_key(key)
    }

    /// Position of a key in insertion order
    pub fn position(&self, key: &RecordKey) -> Option<usize> {
        self.records.get_index_of(key)
    }

    pub fn get_index(&self, index: usize) -> Option<&Record> {
        self.records.get_index(index).map(|(_, record)| record)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a Record;
    type IntoIter = indexmap::map::Values<'a, RecordKey, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_preserves_order() {
        let table = RecordTable::from_records(vec![
            Record::new("carol"),
            Record::new("alice"),
            Record::new("bob"),
        ])
        .unwrap();

        let keys: Vec<&str> = table.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["carol", "alice", "bob"]);
        assert_eq!(table.position(&"alice".into()), Some(1));
        assert_eq!(table.get_index(2).unwrap().key.as_str(), "bob");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = RecordTable::from_records(vec![Record::new("a"), Record::new("a")]).unwrap_err();
        assert!(matches!(err, MatchError::DuplicateRecord(ref k) if k.as_str() == "a"));
    }

    #[test]
    fn test_record_attributes() {
        let record = Record::new("dana")
            .with("seniority", 7i64)
            .with("interests", vec!["ml", "compilers"]);

        assert_eq!(record.get("seniority").unwrap().as_integer(), Some(7));
        assert_eq!(record.get("interests").unwrap().as_list().unwrap().len(), 2);
        assert!(record.get("missing").is_none());
    }
}
