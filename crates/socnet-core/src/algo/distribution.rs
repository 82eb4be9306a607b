//! Degree distribution.

use crate::Graph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Histogram of node degrees with a small summary.
///
/// Degrees count incident edges, so for directed graphs they are in + out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeDistribution {
    /// degree -> number of nodes with that degree.
    pub histogram: BTreeMap<usize, usize>,
    /// Smallest degree (0 for an empty graph).
    pub min: usize,
    /// Largest degree (0 for an empty graph).
    pub max: usize,
    /// Mean degree (0 for an empty graph).
    pub mean: f64,
}

/// Compute the degree histogram.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_distribution(graph: &Graph) -> DegreeDistribution {
    let mut histogram = BTreeMap::new();
    let mut total = 0usize;
    for v in graph.node_indices() {
        let d = graph.degree(v);
        *histogram.entry(d).or_insert(0) += 1;
        total += d;
    }

    let n = graph.node_count();
    DegreeDistribution {
        min: histogram.keys().next().copied().unwrap_or(0),
        max: histogram.keys().next_back().copied().unwrap_or(0),
        mean: if n == 0 { 0.0 } else { total as f64 / n as f64 },
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_distribution() {
        let g = Graph::from_pairs(&[("hub", "a"), ("hub", "b"), ("hub", "c")], false).unwrap();
        let dist = degree_distribution(&g);
        assert_eq!(dist.histogram.get(&1), Some(&3));
        assert_eq!(dist.histogram.get(&3), Some(&1));
        assert_eq!((dist.min, dist.max), (1, 3));
        assert!((dist.mean - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_sums_to_node_count() {
        let g = Graph::from_pairs(&[("a", "b"), ("b", "c"), ("d", "e")], true).unwrap();
        let dist = degree_distribution(&g);
        assert_eq!(dist.histogram.values().sum::<usize>(), g.node_count());
    }

    #[test]
    fn test_empty() {
        let dist = degree_distribution(&Graph::empty(true));
        assert!(dist.histogram.is_empty());
        assert_eq!(dist.mean, 0.0);
    }
}
