//! Activity prediction: which members are likely to be the most active.
//!
//! Activity is not observed in a bare graph, so it is approximated by how
//! connected a member is. The training-free predictor here scores each node
//! by its degree centrality, `degree / (n - 1)`. The learned predictor in
//! `socnet-nn` fits embeddings against the same degree proxy and shares the
//! ranking contract below:
//!
//! - results are sorted by descending activity, ties by ascending id
//! - at most `k` entries; `k == 0` is rejected
//! - an empty graph gives an empty list

use crate::error::{Error, Result};
use crate::{Graph, NodeId};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// One member's predicted activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPrediction {
    /// Node id.
    pub id: NodeId,
    /// Display label.
    pub label: String,
    /// Predicted activity in `[0, 1]` for undirected graphs.
    pub predicted_activity: f64,
    /// Degree in the graph, for context.
    pub degree: usize,
}

/// Rank nodes by `scores` (one per node index) and keep the top `k`.
///
/// Non-finite scores rank last and are reported as 0.
pub fn rank_activity(graph: &Graph, scores: &[f64], k: usize) -> Result<Vec<ActivityPrediction>> {
    if k == 0 {
        return Err(Error::InvalidK(k));
    }
    if scores.len() != graph.node_count() {
        return Err(Error::InvalidParameter {
            name: "scores",
            reason: format!("{} scores for {} nodes", scores.len(), graph.node_count()),
        });
    }

    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    // index order is id order, so a stable sort keeps ties by id
    ranked.sort_by(|a, b| rank_key(b.1).total_cmp(&rank_key(a.1)));
    ranked.truncate(k);

    Ok(ranked
        .into_iter()
        .map(|(i, score)| {
            let node = &graph.nodes()[i];
            ActivityPrediction {
                id: node.id.clone(),
                label: node.label.clone(),
                predicted_activity: if score.is_finite() { score } else { 0.0 },
                degree: graph.degree(NodeIndex::new(i)),
            }
        })
        .collect())
}

fn rank_key(score: f64) -> f64 {
    if score.is_finite() {
        score
    } else {
        f64::NEG_INFINITY
    }
}

/// Degree centrality of every node, in index order.
#[must_use]
pub fn degree_activity_scores(graph: &Graph) -> Vec<f64> {
    let n = graph.node_count();
    let norm = if n > 1 { (n - 1) as f64 } else { 1.0 };
    graph.node_indices().map(|idx| graph.degree(idx) as f64 / norm).collect()
}

/// Top `k` members by degree centrality.
///
/// ```rust
/// use socnet_core::Graph;
/// use socnet_core::algo::activity::predict_activity;
///
/// let g = Graph::from_pairs(&[("hub", "a"), ("hub", "b"), ("hub", "c")], false).unwrap();
/// let top = predict_activity(&g, 2).unwrap();
/// assert_eq!(top[0].id.as_str(), "hub");
/// assert_eq!(top[0].predicted_activity, 1.0);
/// assert_eq!(top[1].id.as_str(), "a");
/// ```
pub fn predict_activity(graph: &Graph, k: usize) -> Result<Vec<ActivityPrediction>> {
    rank_activity(graph, &degree_activity_scores(graph), k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_ranking() {
        let g = Graph::from_pairs(
            &[("hub", "c"), ("hub", "b"), ("hub", "a"), ("a", "b")],
            false,
        )
        .unwrap();
        let top = predict_activity(&g, 10).unwrap();
        let ids: Vec<&str> = top.iter().map(|p| p.id.as_str()).collect();
        // a and b tie at degree 2; id order breaks the tie
        assert_eq!(ids, vec!["hub", "a", "b", "c"]);
        assert_eq!(top[0].degree, 3);
        assert_eq!(top[0].label, "hub");
        assert!((top[1].predicted_activity - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_k_and_empty_graph() {
        let g = Graph::from_pairs(&[("a", "b")], false).unwrap();
        assert_eq!(predict_activity(&g, 0), Err(Error::InvalidK(0)));
        assert_eq!(predict_activity(&g, 1).unwrap().len(), 1);
        assert!(predict_activity(&Graph::empty(false), 5).unwrap().is_empty());
    }

    #[test]
    fn test_rank_activity_checks_length() {
        let g = Graph::from_pairs(&[("a", "b")], false).unwrap();
        assert!(matches!(
            rank_activity(&g, &[0.5], 1),
            Err(Error::InvalidParameter { name: "scores", .. })
        ));
        let top = rank_activity(&g, &[f64::NAN, 0.1], 2).unwrap();
        assert_eq!(top[0].id.as_str(), "b");
        assert_eq!(top[1].predicted_activity, 0.0);
    }
}
