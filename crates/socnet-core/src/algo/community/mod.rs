//! Community detection.
//!
//! Every algorithm implements [`CommunityDetector`] and returns a
//! [`Partition`]: a dense community id per node plus the partition's
//! modularity. Algorithms are selected by [`CommunityAlgorithm`] tag, and an
//! unknown tag is rejected before any work starts.
//!
//! | Algorithm | Strategy | Complexity | Deterministic order |
//! |-----------|----------|------------|---------------------|
//! | Louvain | Greedy modularity moves + coarsening | ~O(E log V) | Ascending id per level |
//! | Label propagation | Weighted majority vote | O(E × sweeps) | Colour classes, ascending id |
//! | Girvan-Newman | Remove max-betweenness edge | O(E² V) | Ties → lowest edge key |
//!
//! All three run on the undirected, weighted view of the graph.
//!
//! # Community ids
//!
//! Ids are dense integers from 0, assigned in ascending order of each
//! community's smallest member id. The numbering carries no meaning across
//! runs or algorithms; match communities by overlap (see
//! [`crate::compare`]).
//!
//! # References
//!
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks"
//! - Blondel et al. (2008). "Fast unfolding of communities in large networks"
//! - Raghavan, Albert & Kumara (2007). "Near linear time algorithm to detect community structures"
//! - Cordasco & Gargano (2010). "Community detection via semi-synchronous label
//!   propagation algorithms"

mod girvan_newman;
mod label_propagation;
mod louvain;
mod modularity;

pub use girvan_newman::GirvanNewman;
pub use label_propagation::LabelPropagation;
pub use louvain::Louvain;
pub use modularity::modularity;

pub(crate) use modularity::WeightedAdjacency;

use crate::error::{Error, Result};
use crate::{Graph, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Community detection algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityAlgorithm {
    /// Louvain modularity optimisation.
    Louvain,
    /// Semi-synchronous label propagation.
    LabelPropagation,
    /// Divisive edge-betweenness clustering.
    GirvanNewman,
}

impl CommunityAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [CommunityAlgorithm; 3] = [
        CommunityAlgorithm::Louvain,
        CommunityAlgorithm::LabelPropagation,
        CommunityAlgorithm::GirvanNewman,
    ];

    /// Tag used in configs and result metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            CommunityAlgorithm::Louvain => "louvain",
            CommunityAlgorithm::LabelPropagation => "label_propagation",
            CommunityAlgorithm::GirvanNewman => "girvan_newman",
        }
    }

    /// The implementation behind this tag.
    pub fn detector(self) -> &'static dyn CommunityDetector {
        match self {
            CommunityAlgorithm::Louvain => &Louvain,
            CommunityAlgorithm::LabelPropagation => &LabelPropagation,
            CommunityAlgorithm::GirvanNewman => &GirvanNewman,
        }
    }
}

impl fmt::Display for CommunityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunityAlgorithm {
    type Err = Error;

    /// Accepts `louvain`, `label_propagation`, `girvan_newman`, case-insensitive,
    /// with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CommunityAlgorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| Error::UnknownAlgorithm {
                family: "community",
                name: s.to_string(),
            })
    }
}

/// Parameters shared by all community detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityParams {
    /// Cap on passes (Louvain, per level), sweeps (label propagation) or
    /// edge removals (Girvan-Newman).
    pub max_iterations: usize,
    /// Modularity resolution γ.
    pub resolution: f64,
    /// Girvan-Newman: stop once this many communities exist.
    pub target_communities: Option<usize>,
    /// Girvan-Newman: stop once modularity reaches this value.
    pub modularity_threshold: Option<f64>,
}

impl Default for CommunityParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            resolution: 1.0,
            target_communities: None,
            modularity_threshold: None,
        }
    }
}

impl CommunityParams {
    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the resolution.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the Girvan-Newman community target.
    pub fn with_target_communities(mut self, target: usize) -> Self {
        self.target_communities = Some(target);
        self
    }

    /// Set the Girvan-Newman modularity threshold.
    pub fn with_modularity_threshold(mut self, threshold: f64) -> Self {
        self.modularity_threshold = Some(threshold);
        self
    }

    /// Check ranges; called before any detector runs.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::invalid("max_iterations", "must be at least 1"));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::invalid(
                "resolution",
                format!("must be positive, got {}", self.resolution),
            ));
        }
        if self.target_communities == Some(0) {
            return Err(Error::invalid("target_communities", "must be at least 1"));
        }
        if let Some(t) = self.modularity_threshold {
            if !t.is_finite() || t > 1.0 {
                return Err(Error::invalid(
                    "modularity_threshold",
                    format!("must be at most 1, got {t}"),
                ));
            }
        }
        Ok(())
    }
}

/// A community detection strategy.
pub trait CommunityDetector: Send + Sync {
    /// Tag of this implementation.
    fn algorithm(&self) -> CommunityAlgorithm;

    /// Partition `graph`. `params` have already been validated.
    fn partition(&self, graph: &Graph, params: &CommunityParams) -> Partition;

    /// Validate `params` and partition `graph`.
    fn detect(&self, graph: &Graph, params: &CommunityParams) -> Result<Partition> {
        params.validate()?;
        Ok(self.partition(graph, params))
    }
}

/// Run the detector for `algorithm`.
pub fn detect(
    graph: &Graph,
    algorithm: CommunityAlgorithm,
    params: &CommunityParams,
) -> Result<Partition> {
    algorithm.detector().detect(graph, params)
}

/// Resolve `name` and run that detector. Unknown names fail before any work.
pub fn detect_by_name(graph: &Graph, name: &str, params: &CommunityParams) -> Result<Partition> {
    detect(graph, name.parse()?, params)
}

/// Community assignment produced by one detector run.
///
/// Deserialization goes through [`Partition::validate`], so a partition read
/// back from JSON always has dense ids below `community_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PartitionData")]
pub struct Partition {
    /// Algorithm that produced it.
    pub algorithm: CommunityAlgorithm,
    /// Dense community id per node.
    pub assignment: BTreeMap<NodeId, usize>,
    /// Modularity at the resolution used.
    pub modularity: f64,
    /// Number of communities.
    pub community_count: usize,
}

/// Wire form of a [`Partition`], checked before use.
#[derive(Debug, Deserialize)]
struct PartitionData {
    algorithm: CommunityAlgorithm,
    assignment: BTreeMap<NodeId, usize>,
    modularity: f64,
    community_count: usize,
}

impl TryFrom<PartitionData> for Partition {
    type Error = Error;

    fn try_from(data: PartitionData) -> Result<Self> {
        let partition = Self {
            algorithm: data.algorithm,
            assignment: data.assignment,
            modularity: data.modularity,
            community_count: data.community_count,
        };
        partition.validate()?;
        Ok(partition)
    }
}

impl Partition {
    /// Check that community ids are dense: every id is below
    /// `community_count` and every id in `0..community_count` has a member.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidParameter {
            name: "partition",
            reason,
        };
        if self.community_count > self.assignment.len() {
            return Err(invalid(format!(
                "{} communities for {} nodes",
                self.community_count,
                self.assignment.len()
            )));
        }
        let mut seen = vec![false; self.community_count];
        for (id, &c) in &self.assignment {
            match seen.get_mut(c) {
                Some(slot) => *slot = true,
                None => {
                    return Err(invalid(format!(
                        "node {id} is in community {c}, but there are only {}",
                        self.community_count
                    )))
                }
            }
        }
        if let Some(empty) = seen.iter().position(|&s| !s) {
            return Err(invalid(format!("community {empty} has no members")));
        }
        Ok(())
    }

    /// Number of id slots: one past the largest id in use.
    fn slots(&self) -> usize {
        self.assignment.values().map(|&c| c + 1).max().unwrap_or(0)
    }

    /// Build from per-index labels: renumbers densely, scores modularity.
    pub(crate) fn from_labels(
        graph: &Graph,
        algorithm: CommunityAlgorithm,
        labels: &[usize],
        resolution: f64,
    ) -> Self {
        let dense = renumber(labels);
        let community_count = dense.iter().copied().max().map_or(0, |m| m + 1);
        let modularity = WeightedAdjacency::from_graph(graph).modularity(&dense, resolution);
        let assignment = graph
            .node_indices()
            .map(|idx| (graph.id_of(idx).clone(), dense[idx.index()]))
            .collect();
        Self {
            algorithm,
            assignment,
            modularity,
            community_count,
        }
    }

    /// Members of each community, indexed by community id, ids ascending.
    pub fn communities(&self) -> Vec<Vec<NodeId>> {
        let mut out = vec![Vec::new(); self.slots()];
        for (id, &c) in &self.assignment {
            out[c].push(id.clone());
        }
        out
    }

    /// Community of a node.
    pub fn community_of(&self, id: &NodeId) -> Option<usize> {
        self.assignment.get(id).copied()
    }

    /// Size of each community, indexed by community id.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.slots()];
        for &c in self.assignment.values() {
            sizes[c] += 1;
        }
        sizes
    }

    /// Copies of the graph's nodes tagged with their community.
    ///
    /// The graph itself is never modified.
    pub fn annotate(&self, graph: &Graph) -> Vec<AnnotatedNode> {
        graph
            .nodes()
            .iter()
            .map(|node| AnnotatedNode {
                group: self.community_of(&node.id),
                node: node.clone(),
            })
            .collect()
    }
}

/// A node with its detected community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedNode {
    /// The node record.
    #[serde(flatten)]
    pub node: Node,
    /// Community id, if the node was part of the partition.
    pub group: Option<usize>,
}

/// Map arbitrary labels to 0.. in order of first appearance.
pub(crate) fn renumber(labels: &[usize]) -> Vec<usize> {
    let mut mapping: BTreeMap<usize, usize> = BTreeMap::new();
    labels
        .iter()
        .map(|&l| {
            let next = mapping.len();
            *mapping.entry(l).or_insert(next)
        })
        .collect()
}
