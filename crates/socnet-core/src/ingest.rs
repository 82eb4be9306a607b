//! Raw records → validated [`Graph`].
//!
//! The upload/parsing layer hands over flat node and edge records keyed by
//! external identifiers. [`ingest`] applies the identity scheme (when asked
//! to anonymize) and builds the graph through [`Graph::build`], so every
//! construction rule applies unchanged.

use crate::identity::{anonymous_label, Anonymizer};
use crate::{AttrValue, Edge, Graph, GraphError, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A node record as produced by an upload parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Identifier in the source system (email, handle, row id...).
    pub external_id: String,
    /// Display label, if the source has one.
    #[serde(default)]
    pub label: Option<String>,
    /// Scalar attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl RawNode {
    /// Record with only an external id.
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            label: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// An edge record as produced by an upload parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    /// Source, as an external id.
    pub source_external_id: String,
    /// Target, as an external id.
    pub target_external_id: String,
    /// Weight; 1.0 when absent.
    #[serde(default)]
    pub weight: Option<f64>,
}

impl RawEdge {
    /// Unweighted edge record.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_external_id: source.into(),
            target_external_id: target.into(),
            weight: None,
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Ingestion switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Replace external ids by their SHA-256 digest.
    pub anonymize: bool,
    /// Build a directed graph.
    pub directed: bool,
    /// Create nodes for edge endpoints that have no node record.
    pub implicit_nodes: bool,
    /// Salt for the anonymizer. Ignored unless `anonymize` is set.
    pub salt: Option<String>,
}

impl IngestOptions {
    /// Enable anonymization.
    pub fn anonymized(mut self) -> Self {
        self.anonymize = true;
        self
    }

    /// Build a directed graph.
    pub fn directed(mut self) -> Self {
        self.directed = true;
        self
    }

    /// Derive missing nodes from edge endpoints.
    pub fn with_implicit_nodes(mut self) -> Self {
        self.implicit_nodes = true;
        self
    }

    /// Set the anonymizer salt.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }
}

/// Resolves external ids under one set of options.
struct Resolver {
    anonymizer: Option<Anonymizer>,
}

impl Resolver {
    fn new(options: &IngestOptions) -> Self {
        let anonymizer = options.anonymize.then(|| match &options.salt {
            Some(salt) => Anonymizer::with_salt(salt.clone()),
            None => Anonymizer::new(),
        });
        Self { anonymizer }
    }

    fn id(&self, external: &str) -> NodeId {
        match &self.anonymizer {
            Some(a) => a.assign_id(external),
            None => NodeId::from(external),
        }
    }

    fn node(&self, id: NodeId, label: Option<String>) -> Node {
        let label = match (label, &self.anonymizer) {
            (Some(label), _) => label,
            (None, Some(_)) => anonymous_label(&id),
            (None, None) => id.as_str().to_string(),
        };
        Node::new(id).with_label(label)
    }
}

/// Build a graph from raw records.
///
/// Fails with the same [`GraphError`]s as [`Graph::build`]; ids in the error
/// are the resolved (possibly hashed) ids.
///
/// ```rust
/// use socnet_core::ingest::{ingest, IngestOptions, RawEdge, RawNode};
///
/// let nodes = vec![RawNode::new("alice"), RawNode::new("bob")];
/// let edges = vec![RawEdge::new("alice", "bob")];
/// let graph = ingest(nodes, edges, &IngestOptions::default().anonymized()).unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert!(graph.nodes().iter().all(|n| n.label.starts_with("User ")));
/// ```
pub fn ingest(
    raw_nodes: Vec<RawNode>,
    raw_edges: Vec<RawEdge>,
    options: &IngestOptions,
) -> Result<Graph, GraphError> {
    let resolver = Resolver::new(options);

    let mut nodes: Vec<Node> = raw_nodes
        .into_iter()
        .map(|raw| {
            let id = resolver.id(&raw.external_id);
            let mut node = resolver.node(id, raw.label);
            node.attributes = raw.attributes;
            node
        })
        .collect();

    let edges: Vec<Edge> = raw_edges
        .iter()
        .map(|raw| Edge {
            source: resolver.id(&raw.source_external_id),
            target: resolver.id(&raw.target_external_id),
            weight: raw.weight.unwrap_or(1.0),
        })
        .collect();

    if options.implicit_nodes {
        let mut known: HashSet<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
        let mut implicit = 0usize;
        for edge in &edges {
            for endpoint in [&edge.source, &edge.target] {
                if known.insert(endpoint.clone()) {
                    nodes.push(resolver.node(endpoint.clone(), None));
                    implicit += 1;
                }
            }
        }
        if implicit > 0 {
            tracing::debug!(implicit, "created nodes from edge endpoints");
        }
    }

    let graph = Graph::build(nodes, edges, options.directed)?;
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        anonymized = options.anonymize,
        "ingested graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::assign_id;

    #[test]
    fn test_verbatim_ids_and_labels() {
        let graph = ingest(
            vec![RawNode::new("a").with_label("Alice"), RawNode::new("b")],
            vec![RawEdge::new("a", "b").with_weight(2.5)],
            &IngestOptions::default(),
        )
        .unwrap();
        assert_eq!(graph.node(&"a".into()).unwrap().label, "Alice");
        assert_eq!(graph.node(&"b".into()).unwrap().label, "b");
        assert_eq!(graph.edge_weight(&"a".into(), &"b".into()), Some(2.5));
    }

    #[test]
    fn test_anonymized_ids_are_digests() {
        let graph = ingest(
            vec![RawNode::new("alice"), RawNode::new("bob")],
            vec![RawEdge::new("alice", "bob")],
            &IngestOptions::default().anonymized(),
        )
        .unwrap();
        let alice = assign_id("alice");
        assert!(graph.contains_node(&alice));
        assert!(graph.contains_edge(&alice, &assign_id("bob")));
        assert!(!graph.contains_node(&"alice".into()));
    }

    #[test]
    fn test_reingest_is_identical() {
        let build = || {
            ingest(
                vec![RawNode::new("x"), RawNode::new("y"), RawNode::new("z")],
                vec![RawEdge::new("x", "y"), RawEdge::new("z", "y")],
                &IngestOptions::default().anonymized(),
            )
            .unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_duplicate_external_id_rejected() {
        let err = ingest(
            vec![RawNode::new("a"), RawNode::new("a")],
            vec![],
            &IngestOptions::default().anonymized(),
        )
        .unwrap_err();
        assert_eq!(err, GraphError::DuplicateNodeId(assign_id("a")));
    }

    #[test]
    fn test_missing_endpoint_without_implicit_nodes() {
        let err = ingest(
            vec![RawNode::new("a")],
            vec![RawEdge::new("a", "b")],
            &IngestOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DanglingEdge { .. }));
    }

    #[test]
    fn test_implicit_nodes_from_edges() {
        let graph = ingest(
            vec![RawNode::new("a").with_label("Alice")],
            vec![RawEdge::new("a", "b"), RawEdge::new("b", "c")],
            &IngestOptions::default().with_implicit_nodes(),
        )
        .unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node(&"a".into()).unwrap().label, "Alice");
        assert_eq!(graph.edge_count(), 2);
    }
}
