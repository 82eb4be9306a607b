//! Connected components analysis.
//!
//! Components are always computed on the undirected view (weakly connected
//! components for directed graphs), which is what the diameter and
//! largest-component figures of a social network refer to.

use super::paths::{path_stats, PathStats};
use crate::{Graph, NodeId};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// Union-Find helper functions (at module level per clippy)
fn uf_find(parent: &mut [usize], i: usize) -> usize {
    if parent[i] != i {
        parent[i] = uf_find(parent, parent[i]); // Path compression
    }
    parent[i]
}

fn uf_union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
    let px = uf_find(parent, x);
    let py = uf_find(parent, y);
    if px == py {
        return;
    }
    // Union by rank
    match rank[px].cmp(&rank[py]) {
        Ordering::Less => parent[px] = py,
        Ordering::Greater => parent[py] = px,
        Ordering::Equal => {
            parent[py] = px;
            rank[px] += 1;
        }
    }
}

/// Label `n` nodes by component, given an edge list.
///
/// Labels are dense and numbered in order of each component's lowest node
/// index. Returns `(labels, component_count)`.
pub(crate) fn label_components<I>(n: usize, edges: I) -> (Vec<usize>, usize)
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut parent: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = vec![0; n];
    for (a, b) in edges {
        uf_union(&mut parent, &mut rank, a, b);
    }

    let mut root_label = vec![usize::MAX; n];
    let mut labels = vec![0; n];
    let mut count = 0;
    for i in 0..n {
        let root = uf_find(&mut parent, i);
        if root_label[root] == usize::MAX {
            root_label[root] = count;
            count += 1;
        }
        labels[i] = root_label[root];
    }
    (labels, count)
}

fn graph_components(graph: &Graph) -> Vec<Vec<NodeIndex>> {
    let edges = graph
        .as_petgraph()
        .raw_edges()
        .iter()
        .map(|e| (e.source().index(), e.target().index()));
    let (labels, count) = label_components(graph.node_count(), edges);

    let mut components = vec![Vec::new(); count];
    for (i, &label) in labels.iter().enumerate() {
        components[label].push(NodeIndex::new(i));
    }
    components
}

/// Compute connected components.
///
/// Each component lists its members in ascending id order; components are
/// ordered by their smallest member id.
#[must_use]
pub fn connected_components(graph: &Graph) -> Vec<Vec<NodeId>> {
    graph_components(graph)
        .into_iter()
        .map(|component| component.into_iter().map(|idx| graph.id_of(idx).clone()).collect())
        .collect()
}

/// Members of the largest component (ties: the one holding the smallest id).
#[must_use]
pub fn largest_component(graph: &Graph) -> Vec<NodeIndex> {
    let mut best: Vec<NodeIndex> = Vec::new();
    for component in graph_components(graph) {
        // strict: earlier component wins ties
        if component.len() > best.len() {
            best = component;
        }
    }
    best
}

/// Statistics about connected components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStats {
    /// Number of components.
    pub count: usize,
    /// Size of the largest component.
    pub largest_size: usize,
    /// Diameter of the largest component.
    pub largest_diameter: usize,
    /// Average shortest-path length inside the largest component.
    pub largest_average_path_length: f64,
    /// True when there is exactly one component.
    pub is_connected: bool,
}

/// Component count plus distance figures of the largest component.
///
/// Diameter and path length are only meaningful inside one component, so
/// they are always reported together with that component's size.
#[must_use]
pub fn component_stats(graph: &Graph) -> ComponentStats {
    let components = graph_components(graph);
    let count = components.len();

    let largest = components
        .into_iter()
        .fold(Vec::new(), |best, c| if c.len() > best.len() { c } else { best });
    let PathStats {
        diameter,
        average_path_length,
    } = path_stats(graph, &largest);

    ComponentStats {
        count,
        largest_size: largest.len(),
        largest_diameter: diameter,
        largest_average_path_length: average_path_length,
        is_connected: count == 1,
    }
}
