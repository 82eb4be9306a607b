//! Node types for social graphs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a node.
///
/// Ordered so that every algorithm can visit nodes in a fixed order
/// independent of how the input was listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scalar attribute value attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Free text.
    Text(String),
}

impl AttrValue {
    /// Numeric view of the value, if it has one.
    ///
    /// Booleans map to 0/1; text is never numeric.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Float(f) if f.is_finite() => Some(*f),
            AttrValue::Float(_) | AttrValue::Text(_) => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

/// A node (person, account, ...) in a social graph.
///
/// Community membership is engine output and travels separately, in a
/// [`Partition`](crate::algo::community::Partition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier.
    pub id: NodeId,

    /// Display label.
    pub label: String,

    /// Additional scalar attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Node {
    /// Create a node whose label is its id.
    pub fn new(id: impl Into<NodeId>) -> Self {
        let id = id.into();
        Self {
            label: id.0.clone(),
            id,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label == self.id.0 {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.label, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_order_lexicographically() {
        let mut ids = vec![NodeId::from("b"), NodeId::from("a"), NodeId::from("c")];
        ids.sort();
        assert_eq!(ids, vec![NodeId::from("a"), NodeId::from("b"), NodeId::from("c")]);
    }

    #[test]
    fn test_attr_value_json_is_untagged() {
        let node = Node::new("u1")
            .with_label("Alice")
            .with_attribute("age", 31_i64)
            .with_attribute("verified", true);
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"age\":31"));
        assert!(json.contains("\"verified\":true"));

        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_attr_numeric_view() {
        assert_eq!(AttrValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(AttrValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(AttrValue::Text("x".into()).as_f64(), None);
        assert_eq!(AttrValue::Float(f64::NAN).as_f64(), None);
    }
}
