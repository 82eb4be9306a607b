//! Unweighted shortest-path primitives shared by the metric and community code.
//!
//! All searches are breadth-first over hop counts. Callers supply the
//! neighbor function, so the same code serves directed traversal, the
//! undirected view, and the shrinking edge set used by Girvan-Newman.

use crate::Graph;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// BFS hop distances from `source`. `-1` means unreachable, `0` is the source.
pub(crate) fn bfs_distances<'a, F>(n: usize, source: NodeIndex, neighbors: F) -> Vec<i32>
where
    F: Fn(NodeIndex) -> &'a [NodeIndex],
{
    let mut dist = vec![-1_i32; n];
    dist[source.index()] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let v_dist = dist[v.index()];
        for &w in neighbors(v) {
            if dist[w.index()] < 0 {
                dist[w.index()] = v_dist + 1;
                queue.push_back(w);
            }
        }
    }

    dist
}

/// Single-source shortest-path DAG, as needed by Brandes accumulation.
pub(crate) struct ShortestPathDag {
    /// σ_sv: number of shortest paths from the source to v.
    pub sigma: Vec<f64>,
    /// P_s(v): predecessors of v on shortest paths, in discovery order.
    pub predecessors: Vec<Vec<NodeIndex>>,
    /// Nodes in non-decreasing distance order.
    pub order: Vec<NodeIndex>,
}

/// BFS from `source`, counting shortest paths.
pub(crate) fn shortest_path_dag<'a, F>(n: usize, source: NodeIndex, neighbors: F) -> ShortestPathDag
where
    F: Fn(NodeIndex) -> &'a [NodeIndex],
{
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1_i32; n];
    let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);

    sigma[source.index()] = 1.0;
    dist[source.index()] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let v_idx = v.index();
        let v_dist = dist[v_idx];

        for &w in neighbors(v) {
            let w_idx = w.index();

            if dist[w_idx] < 0 {
                dist[w_idx] = v_dist + 1;
                queue.push_back(w);
            }

            if dist[w_idx] == v_dist + 1 {
                sigma[w_idx] += sigma[v_idx];
                predecessors[w_idx].push(v);
            }
        }
    }

    ShortestPathDag {
        sigma,
        predecessors,
        order,
    }
}

/// Distance summary of a connected node set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStats {
    /// Longest shortest path (hops).
    pub diameter: usize,
    /// Mean shortest-path length over ordered pairs of distinct members.
    pub average_path_length: f64,
}

/// Diameter and average path length over `members`, in the undirected view.
///
/// `members` should be one connected component; pairs that turn out to be
/// unreachable are ignored. One or zero members give zeros.
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn path_stats(graph: &Graph, members: &[NodeIndex]) -> PathStats {
    if members.len() < 2 {
        return PathStats {
            diameter: 0,
            average_path_length: 0.0,
        };
    }

    let n = graph.node_count();
    let mut in_set = vec![false; n];
    for &m in members {
        in_set[m.index()] = true;
    }

    // (eccentricity, distance sum, reachable pairs) per source
    let per_source: Vec<(i32, u64, u64)> = members
        .par_iter()
        .map(|&source| {
            let dist = bfs_distances(n, source, |v| graph.neighbors(v));
            let mut ecc = 0;
            let mut sum = 0_u64;
            let mut pairs = 0_u64;
            for (i, &d) in dist.iter().enumerate() {
                if d > 0 && in_set[i] {
                    ecc = ecc.max(d);
                    sum += d as u64;
                    pairs += 1;
                }
            }
            (ecc, sum, pairs)
        })
        .collect();

    let diameter = per_source.iter().map(|&(e, _, _)| e).max().unwrap_or(0);
    let (sum, pairs) = per_source
        .iter()
        .fold((0_u64, 0_u64), |(s, p), &(_, ds, dp)| (s + ds, p + dp));

    PathStats {
        diameter: diameter as usize,
        average_path_length: if pairs == 0 {
            0.0
        } else {
            sum as f64 / pairs as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bfs_distances_path() {
        let g = Graph::from_pairs(&[("a", "b"), ("b", "c")], false).unwrap();
        let a = g.index_of(&"a".into()).unwrap();
        let dist = bfs_distances(g.node_count(), a, |v| g.neighbors(v));
        assert_eq!(dist, vec![0, 1, 2]);
    }

    #[test]
    fn test_directed_unreachable() {
        let g = Graph::from_pairs(&[("a", "b")], true).unwrap();
        let b = g.index_of(&"b".into()).unwrap();
        let dist = bfs_distances(g.node_count(), b, |v| g.out_neighbors(v));
        assert_eq!(dist, vec![-1, 0]);
    }

    #[test]
    fn test_sigma_counts_parallel_paths() {
        // a-b-d and a-c-d: two shortest paths to d
        let g = Graph::from_pairs(
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
            false,
        )
        .unwrap();
        let a = g.index_of(&"a".into()).unwrap();
        let d = g.index_of(&"d".into()).unwrap();
        let dag = shortest_path_dag(g.node_count(), a, |v| g.neighbors(v));
        assert_eq!(dag.sigma[d.index()], 2.0);
        assert_eq!(dag.predecessors[d.index()].len(), 2);
        assert_eq!(dag.order.len(), 4);
    }

    #[test]
    fn test_path_stats_path_graph() {
        let g = Graph::from_pairs(&[("a", "b"), ("b", "c"), ("c", "d")], false).unwrap();
        let all: Vec<_> = g.node_indices().collect();
        let stats = path_stats(&g, &all);
        assert_eq!(stats.diameter, 3);
        // distances: 1,2,3,1,2,1 each counted twice -> 20 / 12
        assert!((stats.average_path_length - 20.0 / 12.0).abs() < 1e-12);
    }
}
