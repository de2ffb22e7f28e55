//! Attribute value types for mentor and mentee records

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single named attribute on a record.
///
/// Records come from arbitrary tabular sources, so values are loosely typed:
/// text, whole numbers, reals, flags, lists (e.g. interests or languages) and
/// missing cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<AttributeValue>),
    Null,
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of integers and floats, for distance computations.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Number of list items present in both values. Scalars are treated as
    /// one-item lists, nulls as empty ones.
    pub fn shared_items(&self, other: &AttributeValue) -> usize {
        let left = self.items();
        let right = other.items();
        left.iter().filter(|item| right.contains(item)).count()
    }

    fn items(&self) -> Vec<&AttributeValue> {
        match self {
            AttributeValue::List(items) => items.iter().collect(),
            AttributeValue::Null => Vec::new(),
            scalar => vec![scalar],
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Boolean(_) => "Boolean",
            AttributeValue::Integer(_) => "Integer",
            AttributeValue::Float(_) => "Float",
            AttributeValue::String(_) => "String",
            AttributeValue::List(_) => "List",
            AttributeValue::Null => "Null",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(fl) => write!(f, "{}", fl),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            AttributeValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(items: Vec<T>) -> Self {
        AttributeValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

/// Named attributes of a single record
pub type AttributeMap = HashMap<String, AttributeValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_types() {
        assert_eq!(AttributeValue::from("x").type_name(), "String");
        assert_eq!(AttributeValue::Integer(42).type_name(), "Integer");
        assert_eq!(AttributeValue::Float(2.5).type_name(), "Float");
        assert_eq!(AttributeValue::Boolean(true).type_name(), "Boolean");
        assert_eq!(AttributeValue::List(vec![]).type_name(), "List");
        assert_eq!(AttributeValue::Null.type_name(), "Null");
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(AttributeValue::Integer(3).as_number(), Some(3.0));
        assert_eq!(AttributeValue::Float(0.5).as_number(), Some(0.5));
        assert_eq!(AttributeValue::from("3").as_number(), None);
    }

    #[test]
    fn test_shared_items() {
        let a: AttributeValue = vec!["rust", "go", "sql"].into();
        let b: AttributeValue = vec!["sql", "rust"].into();
        assert_eq!(a.shared_items(&b), 2);

        let scalar: AttributeValue = "go".into();
        assert_eq!(a.shared_items(&scalar), 1);
        assert_eq!(a.shared_items(&AttributeValue::Null), 0);
    }

    #[test]
    fn test_untagged_deserialization() {
        let value: AttributeValue = serde_json::from_str(r#"["a", 1, null]"#).unwrap();
        assert_eq!(
            value,
            AttributeValue::List(vec!["a".into(), 1i64.into(), AttributeValue::Null])
        );
    }

    #[test]
    fn test_display() {
        let list: AttributeValue = vec![1i64, 2].into();
        assert_eq!(list.to_string(), "[1, 2]");
        assert_eq!(AttributeValue::from(None::<i64>).to_string(), "null");
    }
}
