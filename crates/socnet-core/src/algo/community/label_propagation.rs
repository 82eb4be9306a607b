//! Semi-synchronous label propagation.
//!
//! Every node starts with its own label and repeatedly adopts the label
//! carrying the most edge weight among its neighbors.
//!
//! Fully synchronous updates oscillate on bipartite structures; fully
//! asynchronous updates depend on visiting order. Here nodes are split
//! into colour classes by a greedy colouring (ascending id), and each class
//! is updated as one batch. No two nodes of a class are adjacent, so a
//! batch update never reads a label written in the same batch.
//!
//! Tie rule: if the node's current label is among the heaviest, keep it;
//! otherwise take the lowest label. Labels are node indices, so "lowest"
//! means "originating at the smallest id".
//!
//! Stops after a sweep with no change, or after `max_iterations` sweeps.

use super::{CommunityAlgorithm, CommunityDetector, CommunityParams, Partition, WeightedAdjacency};
use crate::Graph;
use std::collections::BTreeMap;

/// Label propagation detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelPropagation;

impl CommunityDetector for LabelPropagation {
    fn algorithm(&self) -> CommunityAlgorithm {
        CommunityAlgorithm::LabelPropagation
    }

    fn partition(&self, graph: &Graph, params: &CommunityParams) -> Partition {
        let adjacency = WeightedAdjacency::from_graph(graph);
        let labels = propagate(&adjacency, params.max_iterations);
        Partition::from_labels(
            graph,
            CommunityAlgorithm::LabelPropagation,
            &labels,
            params.resolution,
        )
    }
}

/// Greedy colouring in index order; returns the classes, lowest colour first.
fn colour_classes(g: &WeightedAdjacency) -> Vec<Vec<usize>> {
    let n = g.len();
    let mut colour: Vec<Option<usize>> = vec![None; n];
    let mut classes: Vec<Vec<usize>> = Vec::new();

    for v in 0..n {
        let mut used: Vec<bool> = vec![false; classes.len() + 1];
        for &(u, _) in &g.adj[v] {
            if let Some(c) = colour[u] {
                if c < used.len() {
                    used[c] = true;
                }
            }
        }
        let c = used.iter().position(|&u| !u).unwrap_or(classes.len());
        if c == classes.len() {
            classes.push(Vec::new());
        }
        classes[c].push(v);
        colour[v] = Some(c);
    }

    classes
}

fn propagate(g: &WeightedAdjacency, max_iterations: usize) -> Vec<usize> {
    let mut labels: Vec<usize> = (0..g.len()).collect();
    let classes = colour_classes(g);
    let mut votes: BTreeMap<usize, f64> = BTreeMap::new();

    for sweep in 1..=max_iterations {
        let mut changed = 0usize;
        for class in &classes {
            for &v in class {
                if g.adj[v].is_empty() {
                    continue;
                }
                votes.clear();
                for &(u, w) in &g.adj[v] {
                    *votes.entry(labels[u]).or_insert(0.0) += w;
                }
                let best_weight = votes.values().copied().fold(f64::NEG_INFINITY, f64::max);
                let is_best = |w: f64| (best_weight - w).abs() <= 1e-12 * best_weight.max(1.0);

                let keep = votes.get(&labels[v]).is_some_and(|&w| is_best(w));
                if !keep {
                    // BTreeMap iterates labels ascending
                    if let Some((&label, _)) = votes.iter().find(|(_, &w)| is_best(w)) {
                        labels[v] = label;
                        changed += 1;
                    }
                }
            }
        }
        if changed == 0 {
            tracing::debug!(sweep, "label propagation converged");
            return labels;
        }
    }

    tracing::debug!(max_iterations, "label propagation hit the sweep cap");
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphBuilder, NodeId};

    #[test]
    fn test_two_triangles() {
        let g = Graph::from_pairs(
            &[("0", "1"), ("1", "2"), ("2", "0"), ("3", "4"), ("4", "5"), ("5", "3"), ("2", "3")],
            false,
        )
        .unwrap();
        let p = LabelPropagation.detect(&g, &CommunityParams::default()).unwrap();
        assert_eq!(p.community_count, 2);
        assert_eq!(p.community_of(&"0".into()), p.community_of(&"2".into()));
        assert_eq!(p.community_of(&"3".into()), p.community_of(&"5".into()));
        assert_ne!(p.community_of(&"2".into()), p.community_of(&"3".into()));
    }

    #[test]
    fn test_colouring_is_proper() {
        let g = Graph::from_pairs(
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")],
            false,
        )
        .unwrap();
        let adj = WeightedAdjacency::from_graph(&g);
        let classes = colour_classes(&adj);
        for class in &classes {
            for &v in class {
                for &(u, _) in &adj.adj[v] {
                    assert!(!class.contains(&u), "{v} and {u} share a colour");
                }
            }
        }
        assert_eq!(classes.iter().map(Vec::len).sum::<usize>(), 4);
    }

    #[test]
    fn test_bipartite_does_not_oscillate() {
        // A synchronous update flips the two labels of a single edge forever.
        let g = Graph::from_pairs(&[("a", "b")], false).unwrap();
        let p = LabelPropagation.detect(&g, &CommunityParams::default()).unwrap();
        assert_eq!(p.community_count, 1);
    }

    #[test]
    fn test_isolated_nodes_keep_own_label() {
        let g = GraphBuilder::undirected()
            .node("a")
            .node("b")
            .node("c")
            .edge("a", "b")
            .build()
            .unwrap();
        let p = LabelPropagation.detect(&g, &CommunityParams::default()).unwrap();
        assert_eq!(p.community_count, 2);
        assert_eq!(p.community_of(&NodeId::from("c")), Some(1));
    }

    #[test]
    fn test_heavier_edges_win() {
        // b is pulled towards a by the heavy edge
        let g = GraphBuilder::undirected()
            .node("a")
            .node("b")
            .node("c")
            .node("d")
            .weighted_edge("a", "b", 5.0)
            .weighted_edge("b", "c", 1.0)
            .weighted_edge("c", "d", 5.0)
            .build()
            .unwrap();
        let p = LabelPropagation.detect(&g, &CommunityParams::default()).unwrap();
        assert_eq!(p.community_of(&"a".into()), p.community_of(&"b".into()));
        assert_eq!(p.community_of(&"c".into()), p.community_of(&"d".into()));
        assert_ne!(p.community_of(&"b".into()), p.community_of(&"c".into()));
    }
}
