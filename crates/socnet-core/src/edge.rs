//! Edge types for social graphs.

use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A weighted connection between two nodes.
///
/// Whether it is directed is a property of the owning [`Graph`](crate::Graph),
/// not of the individual edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node.
    pub source: NodeId,

    /// Target node.
    pub target: NodeId,

    /// Strictly positive weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Edge {
    /// Create an edge with weight 1.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: 1.0,
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Identity of this edge inside a graph of the given directedness.
    pub fn key(&self, directed: bool) -> EdgeKey {
        EdgeKey::new(self.source.clone(), self.target.clone(), directed)
    }
}

/// Identity of an edge, used for de-duplication and snapshot diffs.
///
/// For undirected graphs the endpoints are stored in ascending order, so
/// `a-b` and `b-a` produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    /// First endpoint.
    pub source: NodeId,
    /// Second endpoint.
    pub target: NodeId,
}

impl EdgeKey {
    /// Build a key, normalizing endpoint order when `directed` is false.
    pub fn new(source: NodeId, target: NodeId, directed: bool) -> Self {
        if !directed && target < source {
            Self {
                source: target,
                target: source,
            }
        } else {
            Self { source, target }
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undirected_key_is_order_free() {
        let ab = EdgeKey::new("a".into(), "b".into(), false);
        let ba = EdgeKey::new("b".into(), "a".into(), false);
        assert_eq!(ab, ba);
        assert_eq!(ab.source, NodeId::from("a"));
    }

    #[test]
    fn test_directed_key_keeps_order() {
        let ab = EdgeKey::new("a".into(), "b".into(), true);
        let ba = EdgeKey::new("b".into(), "a".into(), true);
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_weight_defaults_to_one() {
        let e: Edge = serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
        assert_eq!(e.weight, 1.0);
    }
}
