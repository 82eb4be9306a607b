//! Link prediction: ranking pairs of people who are not yet connected.
//!
//! Any [`LinkScorer`] plugs into [`rank_links`], which owns the common
//! contract:
//!
//! - candidates are unordered pairs that are not adjacent in the undirected
//!   view (no self-pairs, no existing edges in either direction)
//! - each candidate is reported once, with `source < target`
//! - results are sorted by descending score, ties by ascending
//!   `(source, target)`, and truncated to `k`
//! - `k == 0` is rejected; fewer than two nodes or no candidates give an
//!   empty list
//!
//! The heuristics live in [`heuristics`]. The learned scorer lives in the
//! `socnet-nn` crate and implements the same trait.

pub mod heuristics;

pub use heuristics::HeuristicKind;

use crate::error::{Error, Result};
use crate::{Graph, NodeId};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Scores a candidate pair. Higher means more likely to connect.
pub trait LinkScorer: Send + Sync {
    /// Name used in result metadata.
    fn name(&self) -> &str;

    /// Score for the pair `(u, v)`. Must be finite and symmetric.
    fn score(&self, graph: &Graph, u: NodeIndex, v: NodeIndex) -> f64;
}

/// One predicted edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPrediction {
    /// Smaller endpoint id.
    pub source: NodeId,
    /// Larger endpoint id.
    pub target: NodeId,
    /// Scorer output.
    pub score: f64,
}

/// All candidate pairs, `(smaller index, larger index)`, in index order.
pub fn candidate_pairs(graph: &Graph) -> Vec<(NodeIndex, NodeIndex)> {
    let n = graph.node_count();
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (NodeIndex::new(i), NodeIndex::new(j))))
        .filter(|&(u, v)| !graph.are_adjacent(u, v))
        .collect()
}

/// Ordering of scored candidates: score descending, then pair ascending.
fn by_rank(a: &(NodeIndex, NodeIndex, f64), b: &(NodeIndex, NodeIndex, f64)) -> Ordering {
    b.2.total_cmp(&a.2).then_with(|| (a.0, a.1).cmp(&(b.0, b.1)))
}

/// Score every candidate and return the top `k`.
///
/// ```rust
/// use socnet_core::Graph;
/// use socnet_core::algo::link::{rank_links, HeuristicKind};
///
/// let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
/// let top = rank_links(&g, &HeuristicKind::CommonNeighbors, 1).unwrap();
/// assert_eq!((top[0].source.as_str(), top[0].target.as_str()), ("A", "C"));
/// assert_eq!(top[0].score, 1.0);
/// ```
pub fn rank_links(graph: &Graph, scorer: &dyn LinkScorer, k: usize) -> Result<Vec<LinkPrediction>> {
    if k == 0 {
        return Err(Error::InvalidK(k));
    }
    let n = graph.node_count();
    if n < 2 {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(NodeIndex, NodeIndex, f64)> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let u = NodeIndex::new(i);
            ((i + 1)..n)
                .map(NodeIndex::new)
                .filter(move |&v| !graph.are_adjacent(u, v))
                .map(move |v| {
                    let s = scorer.score(graph, u, v);
                    (u, v, if s.is_nan() { f64::NEG_INFINITY } else { s })
                })
        })
        .collect();

    if scored.len() > k {
        scored.select_nth_unstable_by(k - 1, by_rank);
        scored.truncate(k);
    }
    scored.sort_by(by_rank);

    tracing::debug!(scorer = scorer.name(), k, returned = scored.len(), "ranked candidate links");
    Ok(scored
        .into_iter()
        .map(|(u, v, score)| LinkPrediction {
            source: graph.id_of(u).clone(),
            target: graph.id_of(v).clone(),
            score,
        })
        .collect())
}

/// Top `k` candidates under one heuristic.
pub fn predict_links(
    graph: &Graph,
    heuristic: HeuristicKind,
    k: usize,
) -> Result<Vec<LinkPrediction>> {
    rank_links(graph, &heuristic, k)
}
