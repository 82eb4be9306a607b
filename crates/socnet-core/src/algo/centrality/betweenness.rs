//! Betweenness centrality: measuring brokerage and bridging.
//!
//! # Intuition
//!
//! Betweenness measures how often a node lies on shortest paths between
//! other nodes. High betweenness = broker, bridge, gatekeeper.
//!
//! In a social network: the person who connects different friend groups.
//!
//! # Definition
//!
//! ```text
//! C_B(v) = Σ_{s≠v≠t} σ_st(v) / σ_st
//! ```
//!
//! Where:
//! - σ_st = number of shortest paths from s to t
//! - σ_st(v) = number of those paths passing through v
//!
//! Ties are split: when several shortest paths exist, each carries an equal
//! share.
//!
//! # Brandes' Algorithm (2001)
//!
//! 1. Run BFS from each source s
//! 2. Track σ_sv (shortest path counts) during forward pass
//! 3. Accumulate dependencies δ_s(v) during backward pass
//!
//! ```text
//! δ_s(v) = Σ_{w: v∈P_s(w)} (σ_sv/σ_sw) × (1 + δ_s(w))
//! ```
//!
//! # Normalization
//!
//! Directed graphs divide by (n-1)(n-2). Undirected graphs count every path
//! from both ends, so raw sums are halved first and then divided by
//! (n-1)(n-2)/2. Either way normalized scores lie in [0, 1].
//!
//! # References
//!
//! - Brandes (2001). "A faster algorithm for betweenness centrality"
//! - Freeman (1977). "A set of measures of centrality based on betweenness"

use super::Scores;
use crate::algo::paths::shortest_path_dag;
use crate::Graph;

/// Configuration for betweenness centrality.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BetweennessConfig {
    /// Normalize scores to [0, 1] range.
    pub normalized: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self { normalized: true }
    }
}

impl BetweennessConfig {
    /// Toggle normalization.
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}

/// Compute betweenness centrality using Brandes' algorithm.
///
/// Paths follow edge direction in directed graphs.
///
/// # Complexity
///
/// - Time: O(VE) for unweighted graphs
/// - Space: O(V + E)
///
/// # Example
///
/// ```
/// use socnet_core::Graph;
/// use socnet_core::algo::centrality::{betweenness_centrality, BetweennessConfig};
///
/// // Path: A - B - C
/// let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
/// let scores = betweenness_centrality(&g, BetweennessConfig::default());
///
/// // B is on the only path from A to C
/// assert_eq!(scores[&"B".into()], 1.0);
/// assert_eq!(scores[&"A".into()], 0.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(graph: &Graph, config: BetweennessConfig) -> Scores {
    let n = graph.node_count();
    let mut betweenness = vec![0.0_f64; n];

    if n > 2 {
        for s in graph.node_indices() {
            let dag = shortest_path_dag(n, s, |v| graph.out_neighbors(v));

            // Backward pass: accumulate dependencies
            let mut delta = vec![0.0_f64; n];

            // Process nodes in reverse BFS order (farthest first)
            for &w in dag.order.iter().rev() {
                let w_idx = w.index();
                for &v in &dag.predecessors[w_idx] {
                    let v_idx = v.index();
                    // δ_s(v) += (σ_sv / σ_sw) × (1 + δ_s(w))
                    let coeff = dag.sigma[v_idx] / dag.sigma[w_idx];
                    delta[v_idx] += coeff * (1.0 + delta[w_idx]);
                }
                if w != s {
                    betweenness[w_idx] += delta[w_idx];
                }
            }
        }

        // For undirected graphs, each path is counted twice
        if !graph.is_directed() {
            for b in &mut betweenness {
                *b /= 2.0;
            }
        }

        if config.normalized {
            let pairs = ((n - 1) * (n - 2)) as f64;
            let norm = if graph.is_directed() { pairs } else { pairs / 2.0 };
            for b in &mut betweenness {
                *b /= norm;
            }
        }
    }

    graph
        .node_indices()
        .map(|idx| (graph.id_of(idx).clone(), betweenness[idx.index()]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    fn score(scores: &Scores, id: &str) -> f64 {
        scores[&NodeId::from(id)]
    }

    #[test]
    fn test_betweenness_line_directed() {
        // Line graph: A -> B -> C -> D
        let g = Graph::from_pairs(&[("A", "B"), ("B", "C"), ("C", "D")], true).unwrap();
        let scores =
            betweenness_centrality(&g, BetweennessConfig::default().with_normalized(false));

        // B is on A->C, A->D; C is on A->D, B->D
        assert_eq!(score(&scores, "A"), 0.0);
        assert_eq!(score(&scores, "D"), 0.0);
        assert_eq!(score(&scores, "B"), 2.0);
        assert_eq!(score(&scores, "C"), 2.0);
    }

    #[test]
    fn test_betweenness_star_directed() {
        // No paths go through Hub since all edges originate from Hub
        let g = Graph::from_pairs(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C")], true).unwrap();
        let scores = betweenness_centrality(&g, BetweennessConfig::default());
        for s in scores.values() {
            assert_eq!(*s, 0.0, "Star nodes have no betweenness in directed graph");
        }
    }

    #[test]
    fn test_betweenness_star_undirected() {
        let g = Graph::from_pairs(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C")], false).unwrap();
        let raw = betweenness_centrality(&g, BetweennessConfig::default().with_normalized(false));
        // Hub is on the paths A-B, A-C, B-C
        assert_eq!(score(&raw, "Hub"), 3.0);

        let norm = betweenness_centrality(&g, BetweennessConfig::default());
        assert!((score(&norm, "Hub") - 1.0).abs() < 1e-12);
        assert_eq!(score(&norm, "A"), 0.0);
    }

    #[test]
    fn test_ties_split_proportionally() {
        // Square a-b-d-c-a: two shortest paths between a and d
        let g = Graph::from_pairs(
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
            false,
        )
        .unwrap();
        let raw = betweenness_centrality(&g, BetweennessConfig::default().with_normalized(false));
        // a-d splits evenly between b and c
        assert!((score(&raw, "b") - 0.5).abs() < 1e-12);
        assert!((score(&raw, "c") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_betweenness_bridge() {
        // Two triangles joined by the bridge c-d
        let g = Graph::from_pairs(
            &[("a", "b"), ("b", "c"), ("a", "c"), ("c", "d"), ("d", "e"), ("e", "f"), ("d", "f")],
            false,
        )
        .unwrap();
        let scores = betweenness_centrality(&g, BetweennessConfig::default());
        assert!(score(&scores, "c") > score(&scores, "a"));
        assert!(score(&scores, "d") > score(&scores, "f"));
        for s in scores.values() {
            assert!((0.0..=1.0).contains(s));
        }
    }

    #[test]
    fn test_small_graphs_are_zero() {
        let g = Graph::from_pairs(&[("a", "b")], false).unwrap();
        let scores = betweenness_centrality(&g, BetweennessConfig::default());
        assert!(scores.values().all(|&s| s == 0.0));
        let empty = Graph::empty(false);
        assert!(betweenness_centrality(&empty, BetweennessConfig::default()).is_empty());
    }
}
