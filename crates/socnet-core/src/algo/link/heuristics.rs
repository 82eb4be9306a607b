//! Neighborhood-based link scores.
//!
//! All four work on the undirected view, need no training, and cost
//! O(deg u + deg v) per pair.
//!
//! | Score | Formula | Favors |
//! |-------|---------|--------|
//! | Common neighbors | \|N(u) ∩ N(v)\| | Many shared friends |
//! | Jaccard | \|N(u) ∩ N(v)\| / \|N(u) ∪ N(v)\| | Overlap relative to circle size |
//! | Adamic-Adar | Σ_{z ∈ N(u) ∩ N(v)} 1 / ln deg(z) | Rare shared connectors |
//! | Preferential attachment | deg(u) · deg(v) | Hubs |
//!
//! # References
//!
//! - Liben-Nowell & Kleinberg (2007). "The link-prediction problem for social networks"
//! - Adamic & Adar (2003). "Friends and neighbors on the Web"

use super::LinkScorer;
use crate::error::Error;
use crate::Graph;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Heuristic link scorer tag. Each variant is itself a [`LinkScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Number of shared neighbors.
    CommonNeighbors,
    /// Shared neighbors over the union of neighborhoods.
    Jaccard,
    /// Shared neighbors weighted by 1 / ln(degree).
    AdamicAdar,
    /// Product of degrees.
    PreferentialAttachment,
}

impl HeuristicKind {
    /// Every heuristic.
    pub const ALL: [HeuristicKind; 4] = [
        HeuristicKind::CommonNeighbors,
        HeuristicKind::Jaccard,
        HeuristicKind::AdamicAdar,
        HeuristicKind::PreferentialAttachment,
    ];

    /// Tag used in configs and result metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            HeuristicKind::CommonNeighbors => "common_neighbors",
            HeuristicKind::Jaccard => "jaccard",
            HeuristicKind::AdamicAdar => "adamic_adar",
            HeuristicKind::PreferentialAttachment => "preferential_attachment",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeuristicKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        HeuristicKind::ALL
            .into_iter()
            .find(|h| h.as_str() == normalized)
            .ok_or_else(|| Error::UnknownAlgorithm {
                family: "link",
                name: s.to_string(),
            })
    }
}

impl LinkScorer for HeuristicKind {
    fn name(&self) -> &str {
        self.as_str()
    }

    #[allow(clippy::cast_precision_loss)]
    fn score(&self, graph: &Graph, u: NodeIndex, v: NodeIndex) -> f64 {
        let nu = graph.neighbors(u);
        let nv = graph.neighbors(v);
        match self {
            HeuristicKind::CommonNeighbors => {
                let mut count = 0usize;
                for_each_common(nu, nv, |_| count += 1);
                count as f64
            }
            HeuristicKind::Jaccard => {
                let mut common = 0usize;
                for_each_common(nu, nv, |_| common += 1);
                let union = nu.len() + nv.len() - common;
                if union == 0 {
                    0.0
                } else {
                    common as f64 / union as f64
                }
            }
            HeuristicKind::AdamicAdar => {
                let mut sum = 0.0;
                for_each_common(nu, nv, |z| {
                    // a shared neighbor has degree >= 2, so ln > 0
                    sum += 1.0 / (graph.neighbors(z).len() as f64).ln();
                });
                sum
            }
            HeuristicKind::PreferentialAttachment => (nu.len() * nv.len()) as f64,
        }
    }
}

/// Merge-walk two sorted neighbor lists, calling `f` for each shared node.
fn for_each_common<F: FnMut(NodeIndex)>(a: &[NodeIndex], b: &[NodeIndex], mut f: F) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                f(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}
