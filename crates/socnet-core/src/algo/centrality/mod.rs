//! Centrality algorithms for measuring node importance.
//!
//! # Overview
//!
//! Centrality measures quantify the "importance" of nodes in a graph.
//! Different measures capture different notions of importance:
//!
//! | Algorithm | Question Answered | Complexity |
//! |-----------|-------------------|------------|
//! | Degree | How many connections? | O(V) |
//! | Betweenness | How often on shortest paths? | O(VE) |
//! | Closeness | How close to all others? | O(VE) |
//! | Eigenvector | Connected to important nodes? | O(E × iterations) |
//!
//! # Choosing the Right Measure
//!
//! ```text
//! Want to find...                 Use...
//! ─────────────────────────────────────────────
//! Well-connected people           Degree
//! Brokers / bridges               Betweenness
//! Fast information spreaders      Closeness
//! Influential via connections     Eigenvector
//! ```
//!
//! All scores are keyed by [`NodeId`] in a `BTreeMap`, so iteration and
//! serialization order are stable. [`rank_nodes`] turns any score map into a
//! top-k list.
//!
//! # References
//!
//! - Freeman (1977). "A set of measures of centrality based on betweenness"
//! - Bonacich (1987). "Power and centrality"
//! - Brandes (2001). "A faster algorithm for betweenness centrality"

mod betweenness;
mod closeness;
mod degree;
mod eigenvector;

pub use betweenness::{betweenness_centrality, BetweennessConfig};
pub use closeness::{closeness_centrality, ClosenessConfig, ClosenessVariant};
pub use degree::{degree_centrality, degree_scores, DegreeCentrality};
pub use eigenvector::{eigenvector_centrality, EigenvectorConfig};

use crate::error::{Error, Result};
use crate::{Graph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Score per node.
pub type Scores = BTreeMap<NodeId, f64>;

/// Centrality measure tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralityKind {
    /// Normalized degree.
    Degree,
    /// Normalized Brandes betweenness.
    Betweenness,
    /// Wasserman-Faust closeness.
    Closeness,
    /// Eigenvector centrality (may fail to converge).
    Eigenvector,
}

impl CentralityKind {
    /// Every measure, in report order.
    pub const ALL: [CentralityKind; 4] = [
        CentralityKind::Degree,
        CentralityKind::Betweenness,
        CentralityKind::Closeness,
        CentralityKind::Eigenvector,
    ];

    /// Tag used in configs and result metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            CentralityKind::Degree => "degree",
            CentralityKind::Betweenness => "betweenness",
            CentralityKind::Closeness => "closeness",
            CentralityKind::Eigenvector => "eigenvector",
        }
    }
}

impl fmt::Display for CentralityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CentralityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CentralityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownAlgorithm {
                family: "centrality",
                name: s.to_string(),
            })
    }
}

/// Compute one centrality measure with default settings.
pub fn centrality(graph: &Graph, kind: CentralityKind) -> Result<Scores> {
    Ok(match kind {
        CentralityKind::Degree => degree_scores(graph, true),
        CentralityKind::Betweenness => betweenness_centrality(graph, BetweennessConfig::default()),
        CentralityKind::Closeness => closeness_centrality(graph, ClosenessConfig::default()),
        CentralityKind::Eigenvector => eigenvector_centrality(graph, EigenvectorConfig::default())?,
    })
}

/// One entry of a centrality ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    /// Node id.
    pub id: NodeId,
    /// Its score.
    pub score: f64,
}

/// Top `k` nodes by score, descending; equal scores order by ascending id.
///
/// Fails with [`Error::InvalidK`] when `k` is zero.
pub fn rank_nodes(scores: &Scores, k: usize) -> Result<Vec<RankedNode>> {
    if k == 0 {
        return Err(Error::InvalidK(k));
    }
    let mut ranked: Vec<RankedNode> = scores
        .iter()
        .map(|(id, &score)| RankedNode { id: id.clone(), score })
        .collect();
    // BTreeMap iteration is already id-ascending; a stable sort keeps that for ties.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    Ok(ranked)
}
