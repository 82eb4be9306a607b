//! Weighted modularity on the undirected view.
//!
//! ```text
//! Q = Σ_c [ in_c / 2m  -  γ (tot_c / 2m)² ]
//! ```
//!
//! - `in_c`: sum of A_ij over ordered pairs inside community c
//! - `tot_c`: sum of weighted degrees of c's members
//! - `m`: total edge weight
//! - `γ`: resolution (1 = Newman-Girvan modularity)
//!
//! Directed graphs are symmetrised first: a→b and b→a add up to one
//! undirected weight.

use crate::{Graph, NodeId};
use std::collections::BTreeMap;

/// Symmetric weighted adjacency, possibly with self-loops.
///
/// Self-loops only appear in coarsened graphs, where `self_loops[c]` holds
/// the A_cc entry (twice the internal weight of the merged community).
#[derive(Debug, Clone)]
pub(crate) struct WeightedAdjacency {
    /// Neighbors with weights, sorted by neighbor, self excluded.
    pub adj: Vec<Vec<(usize, f64)>>,
    /// Diagonal entries A_ii.
    pub self_loops: Vec<f64>,
    /// Weighted degree k_i = A_ii + Σ_j A_ij.
    pub strength: Vec<f64>,
    /// 2m = Σ_i k_i.
    pub two_m: f64,
}

impl WeightedAdjacency {
    /// Undirected weighted view of a graph.
    pub fn from_graph(graph: &Graph) -> Self {
        let n = graph.node_count();
        let mut maps: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for edge in graph.edges() {
            let (Some(s), Some(t)) = (graph.index_of(&edge.source), graph.index_of(&edge.target))
            else {
                continue;
            };
            *maps[s.index()].entry(t.index()).or_insert(0.0) += edge.weight;
            *maps[t.index()].entry(s.index()).or_insert(0.0) += edge.weight;
        }
        Self::from_maps(maps, vec![0.0; n])
    }

    pub fn from_maps(maps: Vec<BTreeMap<usize, f64>>, self_loops: Vec<f64>) -> Self {
        let adj: Vec<Vec<(usize, f64)>> =
            maps.into_iter().map(|m| m.into_iter().collect()).collect();
        let strength: Vec<f64> = adj
            .iter()
            .zip(&self_loops)
            .map(|(row, &s)| s + row.iter().map(|&(_, w)| w).sum::<f64>())
            .collect();
        let two_m = strength.iter().sum();
        Self {
            adj,
            self_loops,
            strength,
            two_m,
        }
    }

    pub fn len(&self) -> usize {
        self.adj.len()
    }

    /// Modularity of a labelling (one label per node, any integers).
    pub fn modularity(&self, labels: &[usize], resolution: f64) -> f64 {
        if self.two_m <= 0.0 {
            return 0.0;
        }
        let k = labels.iter().copied().max().map_or(0, |m| m + 1);
        let mut inside = vec![0.0_f64; k];
        let mut total = vec![0.0_f64; k];

        for (i, row) in self.adj.iter().enumerate() {
            let c = labels[i];
            total[c] += self.strength[i];
            inside[c] += self.self_loops[i];
            for &(j, w) in row {
                if labels[j] == c {
                    inside[c] += w;
                }
            }
        }

        inside
            .iter()
            .zip(&total)
            .map(|(&a, &t)| a / self.two_m - resolution * (t / self.two_m).powi(2))
            .sum()
    }
}

/// Modularity of a community assignment.
///
/// Nodes missing from `assignment` count as singleton communities. Graphs
/// without edges have modularity 0.
///
/// ```
/// use socnet_core::{Graph, NodeId};
/// use socnet_core::algo::community::modularity;
/// use std::collections::BTreeMap;
///
/// let g = Graph::from_pairs(&[("a", "b"), ("c", "d")], false).unwrap();
/// let assignment: BTreeMap<NodeId, usize> =
///     [("a", 0), ("b", 0), ("c", 1), ("d", 1)].into_iter().map(|(n, c)| (n.into(), c)).collect();
/// assert!((modularity(&g, &assignment, 1.0) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn modularity(graph: &Graph, assignment: &BTreeMap<NodeId, usize>, resolution: f64) -> f64 {
    let offset = assignment.values().copied().max().map_or(0, |m| m + 1);
    let labels: Vec<usize> = graph
        .node_indices()
        .map(|idx| {
            assignment
                .get(graph.id_of(idx))
                .copied()
                .unwrap_or(offset + idx.index())
        })
        .collect();
    WeightedAdjacency::from_graph(graph).modularity(&labels, resolution)
}
