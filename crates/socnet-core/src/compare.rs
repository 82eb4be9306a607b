//! Snapshot comparison.
//!
//! Two snapshots of the same network are diffed by node id. Ids must come
//! from the same identity scheme ([`crate::identity`]) so that equal ids
//! mean the same real-world entity.
//!
//! # Output
//!
//! - node and edge deltas (common / added / removed, sorted)
//! - growth: deltas of the aggregate metrics of each side
//! - similarity: Jaccard overlap of node and edge sets
//! - community evolution (when partitions are supplied)
//!
//! # Community matching is approximate
//!
//! Community ids are not stable between runs, so continuity is inferred by
//! member overlap. Pairs are taken greedily in order of decreasing overlap
//! (ties: lower before-id, then lower after-id), each community used at most
//! once. This is a greedy bipartite matching and can miss the assignment
//! that maximizes total overlap.

use crate::algo::community::Partition;
use crate::error::Result;
use crate::metrics::{average_degree, density};
use crate::{EdgeKey, Graph, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Identity and capture time of a snapshot.
///
/// Labels the comparison output only; it never affects results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Opaque snapshot id.
    pub id: String,
    /// Capture time.
    pub created_at: DateTime<Utc>,
}

impl SnapshotMeta {
    /// Metadata with an explicit timestamp.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
        }
    }
}

/// A graph with its snapshot metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Metadata.
    pub meta: SnapshotMeta,
    /// The captured graph.
    pub graph: Graph,
}

impl Snapshot {
    /// Pair a graph with its metadata.
    pub fn new(meta: SnapshotMeta, graph: Graph) -> Self {
        Self { meta, graph }
    }
}

/// Node-set difference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDelta {
    /// In both snapshots.
    pub common: Vec<NodeId>,
    /// Only in the later snapshot.
    pub added: Vec<NodeId>,
    /// Only in the earlier snapshot.
    pub removed: Vec<NodeId>,
}

/// Edge-set difference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDelta {
    /// In both snapshots.
    pub common: Vec<EdgeKey>,
    /// Only in the later snapshot.
    pub added: Vec<EdgeKey>,
    /// Only in the earlier snapshot.
    pub removed: Vec<EdgeKey>,
}

/// Change of aggregate metrics, later minus earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    /// Node count change.
    pub node_count_delta: i64,
    /// Edge count change.
    pub edge_count_delta: i64,
    /// Density change.
    pub density_delta: f64,
    /// Average degree change.
    pub avg_degree_delta: f64,
    /// Node count change in percent of the earlier count (0 if it was 0).
    pub node_growth_percent: f64,
    /// Edge count change in percent of the earlier count (0 if it was 0).
    pub edge_growth_percent: f64,
    /// Community count change, when partitions were compared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_count_delta: Option<i64>,
}

/// Jaccard overlap of the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    /// |common nodes| / |all nodes|; 1 when both are empty.
    pub node_jaccard: f64,
    /// |common edges| / |all edges|; 1 when both are empty.
    pub edge_jaccard: f64,
}

/// A community of the earlier snapshot matched to one of the later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityMatch {
    /// Community id in the earlier partition.
    pub before: usize,
    /// Community id in the later partition.
    pub after: usize,
    /// Shared members.
    pub overlap: usize,
    /// Members before.
    pub size_before: usize,
    /// Members after.
    pub size_after: usize,
    /// `size_after - size_before`.
    pub growth: i64,
    /// Growth in percent of `size_before`.
    pub growth_percent: f64,
}

/// Best-effort community continuity between two partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityDelta {
    /// Greedy max-overlap matches, in the order they were taken.
    pub matches: Vec<CommunityMatch>,
    /// Later communities with no match.
    pub emerged: Vec<usize>,
    /// Earlier communities with no match.
    pub dissolved: Vec<usize>,
    /// Communities before.
    pub count_before: usize,
    /// Communities after.
    pub count_after: usize,
    /// `max(0, count_after - count_before)`.
    pub new_communities: usize,
}

impl CommunityDelta {
    /// The `n` matched communities that grew the most (ties: lower before-id).
    pub fn top_growing(&self, n: usize) -> Vec<&CommunityMatch> {
        let mut sorted: Vec<&CommunityMatch> =
            self.matches.iter().filter(|m| m.growth > 0).collect();
        sorted.sort_by(|a, b| b.growth.cmp(&a.growth).then(a.before.cmp(&b.before)));
        sorted.truncate(n);
        sorted
    }
}

/// Everything a comparison reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Earlier snapshot, if compared as snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<SnapshotMeta>,
    /// Later snapshot, if compared as snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<SnapshotMeta>,
    /// Node-set difference.
    pub node_delta: NodeDelta,
    /// Edge-set difference.
    pub edge_delta: EdgeDelta,
    /// Aggregate metric changes.
    pub growth: Growth,
    /// Set overlap.
    pub similarity: Similarity,
    /// Community evolution, when partitions were supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_delta: Option<CommunityDelta>,
    /// Caveats about this comparison.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Diff two graphs (earlier `a`, later `b`).
///
/// When exactly one graph is directed, edges of both are compared as
/// unordered pairs and a warning is attached.
///
/// ```rust
/// use socnet_core::Graph;
/// use socnet_core::compare::compare;
///
/// let a = Graph::from_pairs(&[("1", "2"), ("2", "3")], false).unwrap();
/// let b = Graph::from_pairs(&[("1", "2"), ("2", "4")], false).unwrap();
/// let diff = compare(&a, &b);
/// assert_eq!(diff.node_delta.added, vec!["4".into()]);
/// assert_eq!(diff.node_delta.removed, vec!["3".into()]);
/// ```
#[must_use]
pub fn compare(a: &Graph, b: &Graph) -> ComparisonResult {
    let mut warnings = Vec::new();
    let directed = if a.is_directed() == b.is_directed() {
        a.is_directed()
    } else {
        tracing::warn!("comparing directed with undirected snapshot; edges compared unordered");
        warnings.push(
            "snapshots differ in directedness; edges were compared as unordered pairs".to_string(),
        );
        false
    };

    let nodes_a: BTreeSet<&NodeId> = a.node_ids().collect();
    let nodes_b: BTreeSet<&NodeId> = b.node_ids().collect();
    let node_delta = NodeDelta {
        common: nodes_a.intersection(&nodes_b).map(|&id| id.clone()).collect(),
        added: nodes_b.difference(&nodes_a).map(|&id| id.clone()).collect(),
        removed: nodes_a.difference(&nodes_b).map(|&id| id.clone()).collect(),
    };

    let keys = |g: &Graph| -> BTreeSet<EdgeKey> {
        g.edges().iter().map(|e| e.key(directed)).collect()
    };
    let edges_a = keys(a);
    let edges_b = keys(b);
    let edge_delta = EdgeDelta {
        common: edges_a.intersection(&edges_b).cloned().collect(),
        added: edges_b.difference(&edges_a).cloned().collect(),
        removed: edges_a.difference(&edges_b).cloned().collect(),
    };

    let similarity = Similarity {
        node_jaccard: jaccard(node_delta.common.len(), nodes_a.len() + nodes_b.len()),
        edge_jaccard: jaccard(edge_delta.common.len(), edges_a.len() + edges_b.len()),
    };

    let growth = Growth {
        node_count_delta: count_delta(a.node_count(), b.node_count()),
        edge_count_delta: count_delta(a.edge_count(), b.edge_count()),
        density_delta: density(b) - density(a),
        avg_degree_delta: average_degree(b) - average_degree(a),
        node_growth_percent: percent(a.node_count(), b.node_count()),
        edge_growth_percent: percent(a.edge_count(), b.edge_count()),
        community_count_delta: None,
    };

    tracing::debug!(
        common_nodes = node_delta.common.len(),
        added_nodes = node_delta.added.len(),
        removed_nodes = node_delta.removed.len(),
        "compared snapshots"
    );

    ComparisonResult {
        before: None,
        after: None,
        node_delta,
        edge_delta,
        growth,
        similarity,
        community_delta: None,
        warnings,
    }
}

/// [`compare`] plus community evolution between `pa` (on `a`) and `pb` (on `b`).
///
/// Fails with `InvalidParameter` if either partition has sparse or
/// out-of-range community ids.
pub fn compare_with_partitions(
    a: &Graph,
    b: &Graph,
    pa: &Partition,
    pb: &Partition,
) -> Result<ComparisonResult> {
    let delta = match_communities(pa, pb)?;
    let mut result = compare(a, b);
    result.growth.community_count_delta = Some(count_delta(delta.count_before, delta.count_after));
    result.community_delta = Some(delta);
    Ok(result)
}

/// [`compare`] on snapshots, labelling the result with their metadata.
#[must_use]
pub fn compare_snapshots(before: &Snapshot, after: &Snapshot) -> ComparisonResult {
    let mut result = compare(&before.graph, &after.graph);
    result.before = Some(before.meta.clone());
    result.after = Some(after.meta.clone());
    result
}

/// Greedy max-overlap matching of communities.
///
/// Both partitions are validated first; see [`Partition::validate`].
#[allow(clippy::cast_precision_loss)]
pub fn match_communities(before: &Partition, after: &Partition) -> Result<CommunityDelta> {
    before.validate()?;
    after.validate()?;
    let sizes_before = before.sizes();
    let sizes_after = after.sizes();

    let mut overlap: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for (id, &cb) in &before.assignment {
        if let Some(ca) = after.community_of(id) {
            *overlap.entry((cb, ca)).or_insert(0) += 1;
        }
    }

    let mut pairs: Vec<((usize, usize), usize)> = overlap.into_iter().collect();
    pairs.sort_by(|(ka, a), (kb, b)| b.cmp(a).then(ka.cmp(kb)));

    let mut used_before = HashSet::new();
    let mut used_after = HashSet::new();
    let mut matches = Vec::new();
    for ((cb, ca), shared) in pairs {
        if used_before.contains(&cb) || used_after.contains(&ca) {
            continue;
        }
        used_before.insert(cb);
        used_after.insert(ca);
        let (size_before, size_after) = (sizes_before[cb], sizes_after[ca]);
        let growth = count_delta(size_before, size_after);
        matches.push(CommunityMatch {
            before: cb,
            after: ca,
            overlap: shared,
            size_before,
            size_after,
            growth,
            growth_percent: percent(size_before, size_after),
        });
    }

    Ok(CommunityDelta {
        emerged: (0..after.community_count).filter(|c| !used_after.contains(c)).collect(),
        dissolved: (0..before.community_count).filter(|c| !used_before.contains(c)).collect(),
        count_before: before.community_count,
        count_after: after.community_count,
        new_communities: after.community_count.saturating_sub(before.community_count),
        matches,
    })
}

#[allow(clippy::cast_possible_wrap)]
fn count_delta(before: usize, after: usize) -> i64 {
    after as i64 - before as i64
}

#[allow(clippy::cast_precision_loss)]
fn percent(before: usize, after: usize) -> f64 {
    if before == 0 {
        0.0
    } else {
        (after as f64 - before as f64) / before as f64 * 100.0
    }
}

/// |A ∩ B| / |A ∪ B| from the intersection size and |A| + |B|.
#[allow(clippy::cast_precision_loss)]
fn jaccard(common: usize, total: usize) -> f64 {
    let union = total - common;
    if union == 0 {
        1.0
    } else {
        common as f64 / union as f64
    }
}
