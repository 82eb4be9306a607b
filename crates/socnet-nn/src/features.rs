//! Node and pair features for the link head.
//!
//! Each node gets a small structural vector (normalised degree and
//! log-degree), optionally extended with its numeric attributes. A candidate
//! pair is described symmetrically, so `(u, v)` and `(v, u)` always score the
//! same:
//!
//! ```text
//! pair(u, v) = [ e_u ⊙ e_v | f_u ⊙ f_v | f_u + f_v ]
//! ```
//!
//! where `e` is the skip-gram embedding and `f` the node feature vector.

use serde::{Deserialize, Serialize};
use socnet_core::petgraph::graph::NodeIndex;
use socnet_core::Graph;
use std::collections::BTreeSet;

/// Which per-node features feed the link head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    /// Degree only.
    #[default]
    Degree,
    /// Degree plus every numeric node attribute, min-max scaled.
    DegreeAndAttributes,
}

/// Per-node feature matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFeatures {
    values: Vec<f64>,
    width: usize,
}

impl NodeFeatures {
    /// Build features for every node of `graph`.
    ///
    /// Attribute columns are the union of numeric attribute keys, in key
    /// order; a node missing a key (or holding a non-numeric value) gets 0.
    #[allow(clippy::cast_precision_loss)]
    pub fn build(graph: &Graph, source: FeatureSource) -> Self {
        let max_degree =
            graph.node_indices().map(|i| graph.degree(i)).max().unwrap_or(0).max(1) as f64;
        let log_max = max_degree.ln_1p();

        let keys: Vec<&String> = match source {
            FeatureSource::Degree => Vec::new(),
            FeatureSource::DegreeAndAttributes => graph
                .nodes()
                .iter()
                .flat_map(|n| n.attributes.iter())
                .filter(|(_, v)| v.as_f64().is_some())
                .map(|(k, _)| k)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        let columns: Vec<Vec<f64>> = keys
            .iter()
            .map(|key| {
                let raw: Vec<f64> = graph
                    .nodes()
                    .iter()
                    .map(|n| n.attributes.get(*key).and_then(|v| v.as_f64()).unwrap_or(0.0))
                    .collect();
                min_max(&raw)
            })
            .collect();

        let width = 2 + columns.len();
        let mut values = Vec::with_capacity(graph.node_count() * width);
        for idx in graph.node_indices() {
            let d = graph.degree(idx) as f64;
            values.push(d / max_degree);
            values.push(d.ln_1p() / log_max);
            values.extend(columns.iter().map(|c| c[idx.index()]));
        }
        Self { values, width }
    }

    /// Features per node.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Feature row of one node.
    pub fn row(&self, idx: NodeIndex) -> &[f64] {
        let i = idx.index();
        &self.values[i * self.width..(i + 1) * self.width]
    }
}

fn min_max(raw: &[f64]) -> Vec<f64> {
    let lo = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return vec![0.0; raw.len()];
    }
    raw.iter().map(|x| (x - lo) / span).collect()
}

/// Width of a pair vector for the given embedding and feature widths.
pub fn pair_width(embedding_dim: usize, feature_width: usize) -> usize {
    embedding_dim + 2 * feature_width
}

/// Append the symmetric pair vector of `(u, v)` to `out`.
pub fn pair_features(
    embeddings: &[f32],
    embedding_dim: usize,
    features: &NodeFeatures,
    u: NodeIndex,
    v: NodeIndex,
    out: &mut Vec<f64>,
) {
    let eu = &embeddings[u.index() * embedding_dim..(u.index() + 1) * embedding_dim];
    let ev = &embeddings[v.index() * embedding_dim..(v.index() + 1) * embedding_dim];
    out.extend(eu.iter().zip(ev).map(|(a, b)| f64::from(a * b)));

    let (fu, fv) = (features.row(u), features.row(v));
    out.extend(fu.iter().zip(fv).map(|(a, b)| a * b));
    out.extend(fu.iter().zip(fv).map(|(a, b)| a + b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use socnet_core::{GraphBuilder, Node};

    #[test]
    fn test_degree_features() {
        // star: hub has degree 3, leaves 1
        let g = Graph::from_pairs(&[("hub", "a"), ("hub", "b"), ("hub", "c")], false).unwrap();
        let f = NodeFeatures::build(&g, FeatureSource::Degree);
        assert_eq!(f.width(), 2);
        let hub = g.index_of(&"hub".into()).unwrap();
        assert_eq!(f.row(hub), &[1.0, 1.0]);
        let leaf = g.index_of(&"a".into()).unwrap();
        assert!((f.row(leaf)[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((f.row(leaf)[1] - 2f64.ln() / 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_attribute_columns() {
        let g = GraphBuilder::undirected()
            .add_node(Node::new("a").with_attribute("age", 20i64).with_attribute("city", "x"))
            .add_node(Node::new("b").with_attribute("age", 40i64))
            .add_node(Node::new("c"))
            .edge("a", "b")
            .build()
            .unwrap();
        let f = NodeFeatures::build(&g, FeatureSource::DegreeAndAttributes);
        assert_eq!(f.width(), 3);
        let col = |id: &str| f.row(g.index_of(&id.into()).unwrap())[2];
        assert_eq!(col("a"), 0.5);
        assert_eq!(col("b"), 1.0);
        assert_eq!(col("c"), 0.0);
    }

    #[test]
    fn test_pair_features_symmetric() {
        let g = Graph::from_pairs(&[("a", "b"), ("b", "c")], false).unwrap();
        let f = NodeFeatures::build(&g, FeatureSource::Degree);
        let emb = vec![0.1f32, 0.2, 0.3, 0.4, 0.5, 0.6];
        let (u, v) = (NodeIndex::new(0), NodeIndex::new(2));
        let (mut uv, mut vu) = (Vec::new(), Vec::new());
        pair_features(&emb, 2, &f, u, v, &mut uv);
        pair_features(&emb, 2, &f, v, u, &mut vu);
        assert_eq!(uv, vu);
        assert_eq!(uv.len(), pair_width(2, f.width()));
    }
}
