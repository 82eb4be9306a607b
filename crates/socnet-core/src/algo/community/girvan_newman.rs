//! Divisive community detection (Girvan-Newman).
//!
//! Repeatedly removes the edge with the highest edge betweenness and watches
//! the connected components split apart. Edge betweenness is recomputed
//! after every removal (Brandes accumulation, unweighted hops).
//!
//! Each time the component count changes, the components are scored by
//! modularity against the **original** weighted graph. The run stops when:
//!
//! - `target_communities` is reached → that partition is returned
//! - `modularity_threshold` is reached → that partition is returned
//! - no edges remain, or `max_iterations` removals happened → the
//!   best-modularity partition seen is returned
//!
//! Equal betweenness is broken by the lowest edge key, i.e. the edge whose
//! (smaller id, larger id) pair sorts first.
//!
//! This is the most expensive detector: O(E) removals × O(VE) per
//! recomputation. `max_iterations` bounds the number of removals.

use super::{CommunityAlgorithm, CommunityDetector, CommunityParams, Partition, WeightedAdjacency};
use crate::algo::components::label_components;
use crate::algo::paths::shortest_path_dag;
use crate::Graph;
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;

/// Relative tolerance for treating two betweenness values as equal.
const TIE_TOLERANCE: f64 = 1e-9;

/// Girvan-Newman detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct GirvanNewman;

impl CommunityDetector for GirvanNewman {
    fn algorithm(&self) -> CommunityAlgorithm {
        CommunityAlgorithm::GirvanNewman
    }

    fn partition(&self, graph: &Graph, params: &CommunityParams) -> Partition {
        let labels = divide(graph, params);
        Partition::from_labels(graph, CommunityAlgorithm::GirvanNewman, &labels, params.resolution)
    }
}

fn divide(graph: &Graph, params: &CommunityParams) -> Vec<usize> {
    let n = graph.node_count();
    let original = WeightedAdjacency::from_graph(graph);
    let mut adjacency: Vec<Vec<NodeIndex>> = graph
        .node_indices()
        .map(|v| graph.neighbors(v).to_vec())
        .collect();

    let components = |adjacency: &[Vec<NodeIndex>]| {
        let edges = adjacency
            .iter()
            .enumerate()
            .flat_map(|(v, row)| row.iter().map(move |u| (v, u.index())));
        label_components(n, edges)
    };

    let (mut labels, mut count) = components(adjacency.as_slice());
    let mut best_q = original.modularity(&labels, params.resolution);
    let mut best_labels = labels.clone();

    let reached = |count: usize, q: f64| {
        params.target_communities.is_some_and(|t| count >= t)
            || params.modularity_threshold.is_some_and(|th| q >= th)
    };
    if reached(count, best_q) {
        return labels;
    }

    for removal in 1..=params.max_iterations {
        let Some((a, b)) = max_betweenness_edge(&adjacency) else {
            break;
        };
        adjacency[a.index()].retain(|&x| x != b);
        adjacency[b.index()].retain(|&x| x != a);

        let (next, next_count) = components(adjacency.as_slice());
        if next_count == count {
            continue;
        }
        labels = next;
        count = next_count;

        let q = original.modularity(&labels, params.resolution);
        tracing::debug!(removal, communities = count, modularity = q, "girvan-newman split");
        if reached(count, q) {
            return labels;
        }
        if q > best_q {
            best_q = q;
            best_labels = labels.clone();
        }
    }

    best_labels
}

/// Edge with the highest betweenness in the current adjacency.
///
/// Returned as (smaller index, larger index); `None` when no edges remain.
#[allow(clippy::cast_precision_loss)]
fn max_betweenness_edge(adjacency: &[Vec<NodeIndex>]) -> Option<(NodeIndex, NodeIndex)> {
    let n = adjacency.len();
    let mut scores: BTreeMap<(NodeIndex, NodeIndex), f64> = BTreeMap::new();

    for s in 0..n {
        let source = NodeIndex::new(s);
        let dag = shortest_path_dag(n, source, |v| adjacency[v.index()].as_slice());
        let mut delta = vec![0.0_f64; n];
        for &w in dag.order.iter().rev() {
            let w_idx = w.index();
            for &v in &dag.predecessors[w_idx] {
                let v_idx = v.index();
                let credit = dag.sigma[v_idx] / dag.sigma[w_idx] * (1.0 + delta[w_idx]);
                let key = if v < w { (v, w) } else { (w, v) };
                *scores.entry(key).or_insert(0.0) += credit;
                delta[v_idx] += credit;
            }
        }
    }

    // Ascending key order: strict improvement keeps the lowest key on ties.
    let mut best: Option<((NodeIndex, NodeIndex), f64)> = None;
    for (key, score) in scores {
        match best {
            Some((_, top)) if score <= top + TIE_TOLERANCE * top.max(1.0) => {}
            _ => best = Some((key, score)),
        }
    }
    best.map(|(key, _)| key)
}
