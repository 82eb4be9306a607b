//! Local clustering coefficient.
//!
//! ```text
//! C(v) = 2·T(v) / (k(v)·(k(v) - 1))
//! ```
//!
//! where T(v) is the number of edges among v's neighbors and k(v) its degree,
//! both in the undirected view. Nodes with fewer than two neighbors score 0.
//! The global figure is the plain mean over all nodes, zeros included.
//!
//! # References
//!
//! - Watts & Strogatz (1998). "Collective dynamics of 'small-world' networks"

use crate::{Graph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-node and averaged clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringReport {
    /// Mean local coefficient (0 for an empty graph).
    pub average: f64,
    /// Local coefficient per node.
    pub local: BTreeMap<NodeId, f64>,
}

/// Compute local clustering coefficients and their average.
///
/// # Example
///
/// ```
/// use socnet_core::Graph;
/// use socnet_core::algo::clustering::clustering_coefficients;
///
/// let triangle = Graph::from_pairs(&[("a", "b"), ("b", "c"), ("a", "c")], false).unwrap();
/// assert_eq!(clustering_coefficients(&triangle).average, 1.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn clustering_coefficients(graph: &Graph) -> ClusteringReport {
    let mut local = BTreeMap::new();
    let mut total = 0.0;

    for v in graph.node_indices() {
        let neighbors = graph.neighbors(v);
        let k = neighbors.len();
        let coefficient = if k < 2 {
            0.0
        } else {
            let mut links = 0usize;
            for (i, &u) in neighbors.iter().enumerate() {
                links += neighbors[i + 1..]
                    .iter()
                    .filter(|&&w| graph.are_adjacent(u, w))
                    .count();
            }
            2.0 * links as f64 / (k * (k - 1)) as f64
        };
        total += coefficient;
        local.insert(graph.id_of(v).clone(), coefficient);
    }

    let n = graph.node_count();
    ClusteringReport {
        average: if n == 0 { 0.0 } else { total / n as f64 },
        local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_has_zero_clustering() {
        let g = Graph::from_pairs(&[("hub", "a"), ("hub", "b"), ("hub", "c")], false).unwrap();
        let report = clustering_coefficients(&g);
        assert_eq!(report.average, 0.0);
    }

    #[test]
    fn test_triangle_with_tail() {
        // a-b-c triangle, c-d tail
        let g = Graph::from_pairs(
            &[("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")],
            false,
        )
        .unwrap();
        let report = clustering_coefficients(&g);
        assert_eq!(report.local[&NodeId::from("a")], 1.0);
        // c has neighbors a, b, d with one link among them: 2*1/(3*2)
        assert!((report.local[&NodeId::from("c")] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.local[&NodeId::from("d")], 0.0);
        let expected = (1.0 + 1.0 + 1.0 / 3.0 + 0.0) / 4.0;
        assert!((report.average - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_graph() {
        let report = clustering_coefficients(&Graph::empty(false));
        assert_eq!(report.average, 0.0);
        assert!(report.local.is_empty());
    }
}
