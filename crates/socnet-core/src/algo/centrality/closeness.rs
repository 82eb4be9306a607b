//! Closeness centrality: measuring proximity to all other nodes.
//!
//! # Intuition
//!
//! Closeness measures how quickly information can spread from a node.
//! High closeness = short average distance to all others.
//!
//! # Handling Disconnected Graphs
//!
//! Classic closeness (Bavelas 1950) is undefined when some node is
//! unreachable. Two variants are offered:
//!
//! | Variant | Formula | Behavior |
//! |---------|---------|----------|
//! | **Wasserman-Faust** (default) | (r - 1) / Σ d(v,u) | Counts the r nodes v reaches |
//! | **Harmonic** | Σ_{u≠v} 1/d(v,u) | Unreachable nodes contribute 0 |
//!
//! Here r includes v itself. With `normalized` set, Wasserman-Faust scores
//! are further scaled by (r - 1)/(n - 1), so a node reaching few others
//! cannot outrank a node reaching many, and harmonic scores are divided by
//! (n - 1).
//!
//! Distances follow edge direction in directed graphs.
//!
//! # References
//!
//! - Bavelas (1950). "Communication patterns in task-oriented groups"
//! - Wasserman & Faust (1994). "Social Network Analysis: Methods and Applications"
//! - Rochat (2009). "Closeness centrality extended to unconnected graphs"

use super::Scores;
use crate::algo::paths::bfs_distances;
use crate::Graph;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How unreachable nodes are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosenessVariant {
    /// `(reachable - 1) / Σ d` over the reachable set.
    #[default]
    WassermanFaust,
    /// `Σ 1/d` over all other nodes.
    Harmonic,
}

impl ClosenessVariant {
    /// Tag used in configs and result metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            ClosenessVariant::WassermanFaust => "wasserman_faust",
            ClosenessVariant::Harmonic => "harmonic",
        }
    }
}

/// Configuration for closeness centrality.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosenessConfig {
    /// Formula used.
    pub variant: ClosenessVariant,
    /// Scale by reach (Wasserman-Faust) or by n - 1 (harmonic).
    pub normalized: bool,
}

impl ClosenessConfig {
    /// Set the variant.
    pub fn with_variant(mut self, variant: ClosenessVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Toggle normalization.
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}

/// Compute closeness centrality for all nodes.
///
/// One BFS per node, run in parallel.
///
/// # Complexity
///
/// - Time: O(VE) (BFS from each node)
/// - Space: O(V) per worker
///
/// # Example
///
/// ```
/// use socnet_core::Graph;
/// use socnet_core::algo::centrality::{closeness_centrality, ClosenessConfig};
///
/// let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
/// let scores = closeness_centrality(&g, ClosenessConfig::default());
/// assert_eq!(scores[&"B".into()], 1.0);          // 2 / (1 + 1)
/// assert!((scores[&"A".into()] - 2.0 / 3.0).abs() < 1e-12); // 2 / (1 + 2)
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn closeness_centrality(graph: &Graph, config: ClosenessConfig) -> Scores {
    let n = graph.node_count();
    let sources: Vec<NodeIndex> = graph.node_indices().collect();

    let values: Vec<f64> = sources
        .par_iter()
        .map(|&source| {
            if n < 2 {
                return 0.0;
            }
            let distances = bfs_distances(n, source, |v| graph.out_neighbors(v));
            let reachable = distances.iter().filter(|&&d| d > 0);

            match config.variant {
                ClosenessVariant::WassermanFaust => {
                    let (count, total) =
                        reachable.fold((0usize, 0i64), |(c, t), &d| (c + 1, t + i64::from(d)));
                    if total == 0 {
                        0.0
                    } else {
                        let base = count as f64 / total as f64;
                        if config.normalized {
                            base * count as f64 / (n - 1) as f64
                        } else {
                            base
                        }
                    }
                }
                ClosenessVariant::Harmonic => {
                    let sum: f64 = reachable.map(|&d| 1.0 / f64::from(d)).sum();
                    if config.normalized {
                        sum / (n - 1) as f64
                    } else {
                        sum
                    }
                }
            }
        })
        .collect();

    sources
        .into_iter()
        .zip(values)
        .map(|(idx, score)| (graph.id_of(idx).clone(), score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphBuilder, NodeId};

    fn score(scores: &Scores, id: &str) -> f64 {
        scores[&NodeId::from(id)]
    }

    #[test]
    fn test_closeness_star_directed() {
        let g = Graph::from_pairs(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C")], true).unwrap();
        let scores = closeness_centrality(&g, ClosenessConfig::default());

        // Hub reaches everyone in 1 hop; leaves reach nobody
        assert_eq!(score(&scores, "Hub"), 1.0);
        assert_eq!(score(&scores, "A"), 0.0);
    }

    #[test]
    fn test_closeness_line_harmonic() {
        let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
        let config = ClosenessConfig::default().with_variant(ClosenessVariant::Harmonic);
        let scores = closeness_centrality(&g, config);

        // Harmonic: B = 1/1 + 1/1 = 2, A = 1/1 + 1/2 = 1.5
        assert!((score(&scores, "B") - 2.0).abs() < 1e-12);
        assert!((score(&scores, "A") - 1.5).abs() < 1e-12);
        assert!((score(&scores, "A") - score(&scores, "C")).abs() < 1e-12);
    }

    #[test]
    fn test_closeness_disconnected_uses_reachable_set() {
        // a-b and c-d-e
        let g = Graph::from_pairs(&[("a", "b"), ("c", "d"), ("d", "e")], false).unwrap();
        let scores = closeness_centrality(&g, ClosenessConfig::default());
        // a reaches only b at distance 1
        assert_eq!(score(&scores, "a"), 1.0);
        assert_eq!(score(&scores, "d"), 1.0);
        assert!((score(&scores, "c") - 2.0 / 3.0).abs() < 1e-12);

        let scaled = closeness_centrality(&g, ClosenessConfig::default().with_normalized(true));
        // scaled by reach: a reaches 1 of 4 others
        assert!((score(&scaled, "a") - 0.25).abs() < 1e-12);
        assert!((score(&scaled, "d") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_isolated_and_single_nodes() {
        let g = GraphBuilder::undirected().node("solo").build().unwrap();
        assert_eq!(score(&closeness_centrality(&g, ClosenessConfig::default()), "solo"), 0.0);

        let g = GraphBuilder::undirected()
            .node("a")
            .node("b")
            .node("c")
            .edge("a", "b")
            .build()
            .unwrap();
        assert_eq!(score(&closeness_centrality(&g, ClosenessConfig::default()), "c"), 0.0);
    }

    #[test]
    fn test_closeness_falls_along_a_path() {
        // a-b-c-d-e-f-g: inner nodes all have degree 2, totals grow towards the ends
        let g = Graph::from_pairs(
            &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "f"), ("f", "g")],
            false,
        )
        .unwrap();
        let scores = closeness_centrality(&g, ClosenessConfig::default());
        assert!(score(&scores, "d") > score(&scores, "c"));
        assert!(score(&scores, "c") > score(&scores, "b"));
        assert!((score(&scores, "b") - score(&scores, "f")).abs() < 1e-12);
        // d: 6 / (1+1+2+2+3+3)
        assert!((score(&scores, "d") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_complete_graph_is_max() {
        let g = Graph::from_pairs(&[("A", "B"), ("B", "C"), ("A", "C")], false).unwrap();
        for variant in [ClosenessVariant::WassermanFaust, ClosenessVariant::Harmonic] {
            let config = ClosenessConfig::default().with_variant(variant).with_normalized(true);
            for (name, s) in closeness_centrality(&g, config) {
                assert!((s - 1.0).abs() < 1e-12, "{name}={s}");
            }
        }
    }
}
