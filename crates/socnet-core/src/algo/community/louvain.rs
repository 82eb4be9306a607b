//! Louvain modularity optimisation.
//!
//! # Algorithm
//!
//! 1. **Local moves.** Visit nodes in ascending index order (ascending id on
//!    the first level). Take the node out of its community and put it into
//!    the neighboring community with the largest gain
//!
//!    ```text
//!    gain(c) = k_i,in(c) - γ · tot_c · k_i / 2m
//!    ```
//!
//!    Ties keep the current community, then prefer the lowest community
//!    index. Repeat passes until a pass moves nothing (or the pass cap).
//! 2. **Coarsening.** Merge each community into one node; internal weight
//!    becomes a self-loop. Coarse nodes are numbered by their smallest
//!    member, so the visitation order stays tied to node id.
//! 3. Repeat on the coarse graph until a level makes no move.
//!
//! With a fixed order and fixed tie rules the result is fully
//! deterministic.

use super::{CommunityAlgorithm, CommunityDetector, CommunityParams, Partition, WeightedAdjacency};
use crate::Graph;
use std::collections::BTreeMap;

/// Minimum gain improvement that counts as a move.
const MIN_GAIN: f64 = 1e-12;

/// Louvain detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Louvain;

impl CommunityDetector for Louvain {
    fn algorithm(&self) -> CommunityAlgorithm {
        CommunityAlgorithm::Louvain
    }

    fn partition(&self, graph: &Graph, params: &CommunityParams) -> Partition {
        let labels = louvain_labels(graph, params);
        Partition::from_labels(graph, CommunityAlgorithm::Louvain, &labels, params.resolution)
    }
}

fn louvain_labels(graph: &Graph, params: &CommunityParams) -> Vec<usize> {
    let mut membership: Vec<usize> = (0..graph.node_count()).collect();
    let mut level_graph = WeightedAdjacency::from_graph(graph);
    if level_graph.two_m <= 0.0 {
        return membership;
    }

    let mut level = 0usize;
    loop {
        let (communities, moved) = local_moves(&level_graph, params);
        level += 1;
        if !moved {
            break;
        }
        let dense = super::renumber(&communities);
        for m in &mut membership {
            *m = dense[*m];
        }
        let coarse_count = dense.iter().copied().max().map_or(0, |m| m + 1);
        tracing::debug!(
            level,
            nodes = level_graph.len(),
            communities = coarse_count,
            "louvain level"
        );
        if coarse_count == level_graph.len() {
            break;
        }
        level_graph = aggregate(&level_graph, &dense, coarse_count);
    }

    membership
}

/// Phase 1. Returns the community per node and whether anything moved.
fn local_moves(g: &WeightedAdjacency, params: &CommunityParams) -> (Vec<usize>, bool) {
    let n = g.len();
    let mut community: Vec<usize> = (0..n).collect();
    let mut total: Vec<f64> = g.strength.clone();
    let gamma_over_2m = params.resolution / g.two_m;
    let mut moved_any = false;

    // weight from the current node to each neighboring community
    let mut links: BTreeMap<usize, f64> = BTreeMap::new();

    for _pass in 0..params.max_iterations {
        let mut moved = false;
        for i in 0..n {
            let k_i = g.strength[i];
            let current = community[i];

            links.clear();
            for &(j, w) in &g.adj[i] {
                *links.entry(community[j]).or_insert(0.0) += w;
            }

            total[current] -= k_i;
            let gain = |c: usize, k_in: f64, total: &[f64]| k_in - gamma_over_2m * total[c] * k_i;

            let mut best = current;
            let mut best_gain = gain(current, links.get(&current).copied().unwrap_or(0.0), &total);
            // BTreeMap order: lowest community index first, so strict > keeps ties low
            for (&c, &k_in) in &links {
                let g_c = gain(c, k_in, &total);
                if g_c > best_gain + MIN_GAIN {
                    best = c;
                    best_gain = g_c;
                }
            }

            total[best] += k_i;
            if best != current {
                community[i] = best;
                moved = true;
            }
        }
        if !moved {
            break;
        }
        moved_any = true;
    }

    (community, moved_any)
}

/// Phase 2: one node per community.
fn aggregate(g: &WeightedAdjacency, dense: &[usize], count: usize) -> WeightedAdjacency {
    let mut maps: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
    let mut self_loops = vec![0.0; count];
    for (i, row) in g.adj.iter().enumerate() {
        let ci = dense[i];
        self_loops[ci] += g.self_loops[i];
        for &(j, w) in row {
            let cj = dense[j];
            if ci == cj {
                // each internal edge is seen from both ends
                self_loops[ci] += w;
            } else {
                *maps[ci].entry(cj).or_insert(0.0) += w;
            }
        }
    }
    WeightedAdjacency::from_maps(maps, self_loops)
}
