//! Degree centrality: the simplest importance measure.
//!
//! # Definition
//!
//! ```text
//! C_D(v) = deg(v) / (n - 1)
//! ```
//!
//! For directed graphs in- and out-degree are reported separately and the
//! total is their sum.
//!
//! # Limitations
//!
//! - Ignores network structure beyond immediate neighbors
//! - A node with 10 low-degree neighbors ranks same as one with 10 hubs
//! - For structural importance, use eigenvector or betweenness centrality

use super::Scores;
use crate::{Graph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Degree centrality result for a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeCentrality {
    /// Number of incoming edges (equals `degree` for undirected graphs).
    pub in_degree: usize,
    /// Number of outgoing edges (equals `degree` for undirected graphs).
    pub out_degree: usize,
    /// Number of incident edges.
    pub degree: usize,
    /// `degree / (n - 1)`.
    pub normalized: f64,
}

/// Compute degree centrality for all nodes.
///
/// # Example
///
/// ```
/// use socnet_core::Graph;
/// use socnet_core::algo::centrality::degree_centrality;
///
/// let g = Graph::from_pairs(&[("A", "B"), ("A", "C"), ("B", "C")], true).unwrap();
/// let degrees = degree_centrality(&g);
/// let a = &degrees[&"A".into()];
/// assert_eq!(a.out_degree, 2);  // A -> B, A -> C
/// assert_eq!(a.in_degree, 0);   // nothing points to A
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(graph: &Graph) -> BTreeMap<NodeId, DegreeCentrality> {
    let n = graph.node_count();
    let norm_factor = if n > 1 { (n - 1) as f64 } else { 1.0 };

    graph
        .node_indices()
        .map(|idx| {
            let in_degree = graph.in_neighbors(idx).len();
            let out_degree = graph.out_neighbors(idx).len();
            let degree = graph.degree(idx);
            (
                graph.id_of(idx).clone(),
                DegreeCentrality {
                    in_degree,
                    out_degree,
                    degree,
                    normalized: degree as f64 / norm_factor,
                },
            )
        })
        .collect()
}

/// Degree per node as a score, raw or divided by `n - 1`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_scores(graph: &Graph, normalized: bool) -> Scores {
    degree_centrality(graph)
        .into_iter()
        .map(|(id, d)| {
            let score = if normalized { d.normalized } else { d.degree as f64 };
            (id, score)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_star() {
        let g = Graph::from_pairs(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C")], true).unwrap();
        let degrees = degree_centrality(&g);

        let hub = degrees[&NodeId::from("Hub")];
        assert_eq!(hub.out_degree, 3);
        assert_eq!(hub.in_degree, 0);
        assert!((hub.normalized - 1.0).abs() < 1e-12);

        let a = degrees[&NodeId::from("A")];
        assert_eq!(a.out_degree, 0);
        assert_eq!(a.in_degree, 1);
    }

    #[test]
    fn test_undirected_in_equals_out() {
        let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
        let b = degree_centrality(&g)[&NodeId::from("B")];
        assert_eq!((b.in_degree, b.out_degree, b.degree), (2, 2, 2));
    }

    #[test]
    fn test_raw_scores() {
        let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
        let raw = degree_scores(&g, false);
        assert_eq!(raw[&NodeId::from("B")], 2.0);
        let norm = degree_scores(&g, true);
        assert_eq!(norm[&NodeId::from("B")], 1.0);
    }

    #[test]
    fn test_empty_graph() {
        assert!(degree_centrality(&Graph::empty(false)).is_empty());
    }
}
