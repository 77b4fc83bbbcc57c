//! Generic tree values addressed by path expressions.
//!
//! A [`Value`] is either a scalar, a mapping from string keys to values, or a
//! sequence of values. JSON and YAML documents deserialize straight into it,
//! and the path evaluator mutates it in place.
//!
//! # Example
//!
//! ```
//! use jsonxs::document::node::{Number, Value};
//! use indexmap::IndexMap;
//!
//! let mut feed = IndexMap::new();
//! feed.insert("id".to_string(), Value::from("my_feed"));
//! feed.insert("count".to_string(), Value::Number(Number::Integer(3)));
//! let doc = Value::Mapping(feed);
//!
//! assert!(doc.is_mapping());
//! assert_eq!(doc.kind(), "mapping");
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A numeric scalar, kept as an integer whenever the source was one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

/// A node in a document tree.
///
/// Mappings keep their insertion order so documents are written back the way
/// they were read, but order plays no part in key lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Returns an empty mapping.
    pub fn mapping() -> Self {
        Value::Mapping(IndexMap::new())
    }

    /// Returns an empty sequence.
    pub fn sequence() -> Self {
        Value::Sequence(Vec::new())
    }

    /// Returns true if this value is a mapping.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonxs::document::node::Value;
    ///
    /// assert!(Value::mapping().is_mapping());
    /// assert!(!Value::sequence().is_mapping());
    /// ```
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Parses a command-line literal.
    ///
    /// Valid JSON is decoded as such (`42`, `true`, `{"a": 1}`); anything
    /// else becomes a plain string, so `--value hello` needs no quoting.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonxs::document::node::{Number, Value};
    ///
    /// assert_eq!(Value::from_literal("42"), Value::Number(Number::Integer(42)));
    /// assert_eq!(Value::from_literal("hello"), Value::from("hello"));
    /// assert_eq!(Value::from_literal("\"42\""), Value::from("42"));
    /// ```
    pub fn from_literal(literal: &str) -> Self {
        serde_json::from_str(literal).unwrap_or_else(|_| Value::String(literal.to_string()))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(_) | Value::Mapping(_) => {
                let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(Number::Integer(i)),
                None => Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_json_keeps_integers() {
        let value: Value = serde_json::from_str(r#"{"a": 1, "b": 1.5, "c": [true, null]}"#).unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map["a"], Value::Number(Number::Integer(1)));
        assert_eq!(map["b"], Value::Number(Number::Float(1.5)));
        assert_eq!(
            map["c"],
            Value::Sequence(vec![Value::Bool(true), Value::Null])
        );
    }

    #[test]
    fn test_deserialize_yaml() {
        let value: Value = serde_yaml::from_str("feed:\n  tags:\n    - devel\n    - python\n").unwrap();
        let feed = value.as_mapping().unwrap()["feed"].as_mapping().unwrap();
        assert_eq!(
            feed["tags"],
            Value::Sequence(vec![Value::from("devel"), Value::from("python")])
        );
    }

    #[test]
    fn test_mapping_order_is_preserved_on_output() {
        let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::from("x").kind(), "string");
        assert_eq!(Value::sequence().kind(), "sequence");
        assert_eq!(Value::mapping().kind(), "mapping");
    }

    #[test]
    fn test_display_scalars_and_containers() {
        assert_eq!(Value::from("python").to_string(), "python");
        assert_eq!(Value::from(3_i64).to_string(), "3");
        assert_eq!(
            Value::Sequence(vec![Value::from("a")]).to_string(),
            r#"["a"]"#
        );
    }
}
