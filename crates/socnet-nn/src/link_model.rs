//! Learned link scorer, trained per request.
//!
//! # Pipeline
//!
//! ```text
//! graph ──walks──▶ corpus ──skip-gram──▶ embeddings ─┐
//!   │                                               ├─▶ pair features ─▶ head ─▶ σ(w·x + b)
//!   └──degree / attributes──▶ node features ─────────┘
//! ```
//!
//! Positives are the existing (undirected) edges; negatives are uniformly
//! sampled non-adjacent pairs. The head is trained by full-batch gradient
//! descent on binary cross-entropy for a fixed number of epochs.
//!
//! # Budget
//!
//! Training runs under a wall-clock [`Deadline`] checked between walk rounds,
//! between walks during skip-gram, and before every head epoch. When it
//! expires, training stops with [`Error::TrainingTimeout`]; nothing partial
//! is returned.
//!
//! # Scope
//!
//! A trained [`LearnedLinkScorer`] belongs to the graph it was trained on.
//! It is a plain value: no cache, no global state, dropped with the request.

use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::features::{pair_features, pair_width, FeatureSource, NodeFeatures};
use crate::skipgram::{SkipGram, SkipGramConfig};
use crate::walks::{generate_walks, WalkConfig};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use socnet_core::algo::link::{rank_links, LinkPrediction, LinkScorer};
use socnet_core::petgraph::graph::NodeIndex;
use socnet_core::Graph;
use std::collections::BTreeSet;
use std::time::Duration;

/// Probability clamp inside the log-loss.
const EPS: f64 = 1e-7;

/// Settings for [`train`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Random-walk corpus.
    pub walks: WalkConfig,
    /// Embedding model.
    pub skipgram: SkipGramConfig,
    /// Node features next to the embeddings.
    pub features: FeatureSource,
    /// Fixed number of head epochs.
    pub head_epochs: usize,
    /// Head learning rate.
    pub learning_rate: f64,
    /// L2 penalty on head weights.
    pub l2: f64,
    /// Negatives sampled per positive.
    pub negative_ratio: f64,
    /// Fewer edges than this is [`Error::InsufficientData`].
    pub min_edges: usize,
    /// Wall-clock budget in milliseconds.
    pub timeout_ms: u64,
    /// Seed for negative sampling.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            walks: WalkConfig::default(),
            skipgram: SkipGramConfig::default(),
            features: FeatureSource::Degree,
            head_epochs: 100,
            learning_rate: 0.5,
            l2: 1e-4,
            negative_ratio: 1.0,
            min_edges: 3,
            timeout_ms: 2_000,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Seed every random component.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.walks.seed = seed;
        self.skipgram.seed = seed;
        self
    }

    /// Set the time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the head epoch count.
    pub fn with_head_epochs(mut self, epochs: usize) -> Self {
        self.head_epochs = epochs;
        self
    }

    /// Set the embedding dimension.
    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.skipgram.embedding_dim = dim;
        self
    }

    /// Set the node feature source.
    pub fn with_features(mut self, features: FeatureSource) -> Self {
        self.features = features;
        self
    }

    /// Set the minimum edge count.
    pub fn with_min_edges(mut self, min_edges: usize) -> Self {
        self.min_edges = min_edges;
        self
    }

    /// The budget as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings that cannot train.
    pub fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, reason: String| {
            Error::Core(socnet_core::Error::InvalidParameter { name, reason })
        };
        self.walks.validate()?;
        if self.skipgram.embedding_dim == 0 {
            return Err(invalid("embedding_dim", "must be positive".to_string()));
        }
        if self.head_epochs == 0 {
            return Err(invalid("head_epochs", "must be positive".to_string()));
        }
        for (name, value) in [
            ("learning_rate", self.learning_rate),
            ("negative_ratio", self.negative_ratio),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, format!("must be positive and finite, got {value}")));
            }
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(invalid("l2", format!("must be non-negative, got {}", self.l2)));
        }
        Ok(())
    }
}

/// Logistic regression over pair features.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LogisticHead {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticHead {
    /// Full-batch gradient descent on mean binary cross-entropy.
    ///
    /// `x` is row-major with `width` columns.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn fit(
        x: &[f64],
        y: &[f64],
        width: usize,
        config: &TrainingConfig,
        deadline: &Deadline,
    ) -> Result<(Self, f64)> {
        let rows = y.len();
        let mut head = Self {
            weights: vec![0.0; width],
            bias: 0.0,
        };
        let mut loss = f64::NAN;
        let mut grad_w = vec![0.0; width];

        for epoch in 0..config.head_epochs {
            deadline.check(epoch)?;
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;
            loss = 0.0;

            for (row, &label) in x.chunks_exact(width).zip(y) {
                let p = head.predict(row);
                let pc = p.clamp(EPS, 1.0 - EPS);
                loss -= label * pc.ln() + (1.0 - label) * (1.0 - pc).ln();
                let err = p - label;
                for (g, xi) in grad_w.iter_mut().zip(row) {
                    *g += err * xi;
                }
                grad_b += err;
            }

            loss /= rows as f64;
            if !loss.is_finite() {
                return Err(Error::Diverged { epoch });
            }
            let scale = config.learning_rate / rows as f64;
            for (w, g) in head.weights.iter_mut().zip(&grad_w) {
                *w -= scale * g + config.learning_rate * config.l2 * *w;
            }
            head.bias -= scale * grad_b;
        }
        Ok((head, loss))
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let z: f64 = self.bias + self.weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }
}

/// A link scorer trained on one graph.
#[derive(Debug, Clone)]
pub struct LearnedLinkScorer {
    embeddings: Vec<f32>,
    embedding_dim: usize,
    features: NodeFeatures,
    head: LogisticHead,
    num_nodes: usize,
    final_loss: f64,
}

impl LearnedLinkScorer {
    /// Mean training loss after the last epoch.
    pub fn final_loss(&self) -> f64 {
        self.final_loss
    }

    /// Probability-like score of `(u, v)`; 0 for indices outside the
    /// training graph.
    pub fn probability(&self, u: NodeIndex, v: NodeIndex) -> f64 {
        if u.index() >= self.num_nodes || v.index() >= self.num_nodes {
            return 0.0;
        }
        let mut x = Vec::with_capacity(self.head.weights.len());
        pair_features(&self.embeddings, self.embedding_dim, &self.features, u, v, &mut x);
        self.head.predict(&x)
    }
}

impl LinkScorer for LearnedLinkScorer {
    fn name(&self) -> &str {
        "learned"
    }

    fn score(&self, _graph: &Graph, u: NodeIndex, v: NodeIndex) -> f64 {
        self.probability(u, v)
    }
}

/// Existing undirected edges as `(smaller, larger)` index pairs.
fn positive_pairs(graph: &Graph) -> Vec<(NodeIndex, NodeIndex)> {
    graph
        .node_indices()
        .flat_map(|u| graph.neighbors(u).iter().filter(move |&&v| v > u).map(move |&v| (u, v)))
        .collect()
}

/// Uniformly sampled non-adjacent pairs.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn sample_negatives(
    graph: &Graph,
    positives: usize,
    config: &TrainingConfig,
) -> Result<Vec<(NodeIndex, NodeIndex)>> {
    let n = graph.node_count();
    let non_edges = n * n.saturating_sub(1) / 2 - positives;
    if non_edges == 0 {
        return Err(Error::InsufficientData(
            "no non-adjacent pairs to sample negatives from".into(),
        ));
    }
    let want = ((positives as f64 * config.negative_ratio).ceil() as usize).clamp(1, non_edges);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut sampled = BTreeSet::new();
    let max_attempts = want * 50 + 100;
    for _ in 0..max_attempts {
        if sampled.len() == want {
            break;
        }
        let (a, b) = (rng.random_range(0..n), rng.random_range(0..n));
        if a == b {
            continue;
        }
        let (u, v) = (NodeIndex::new(a.min(b)), NodeIndex::new(a.max(b)));
        if !graph.are_adjacent(u, v) {
            sampled.insert((u, v));
        }
    }
    Ok(sampled.into_iter().collect())
}

/// Walk corpus and skip-gram embeddings of every node, row-major.
pub(crate) fn node_embeddings(
    graph: &Graph,
    config: &TrainingConfig,
    deadline: &Deadline,
) -> Result<(Vec<f32>, usize)> {
    let walks = generate_walks(graph, &config.walks, deadline)?;
    let mut skipgram = SkipGram::new(graph.node_count(), config.skipgram);
    skipgram.train(&walks, deadline)?;
    let dim = skipgram.dim();
    Ok((skipgram.into_embeddings(), dim))
}

/// Train a scorer on `graph`.
///
/// Fails with [`Error::InsufficientData`] when the graph has fewer than
/// `min_edges` edges or no non-adjacent pair, [`Error::TrainingTimeout`]
/// when the budget runs out, and [`Error::Diverged`] on a non-finite loss.
pub fn train(graph: &Graph, config: &TrainingConfig) -> Result<LearnedLinkScorer> {
    config.validate()?;
    let deadline = Deadline::start(config.timeout());

    let positives = positive_pairs(graph);
    if positives.len() < config.min_edges.max(1) {
        return Err(Error::InsufficientData(format!(
            "{} edges, at least {} required",
            positives.len(),
            config.min_edges.max(1)
        )));
    }
    let negatives = sample_negatives(graph, positives.len(), config)?;

    let (embeddings, embedding_dim) = node_embeddings(graph, config, &deadline)?;
    let features = NodeFeatures::build(graph, config.features);

    let width = pair_width(embedding_dim, features.width());
    let rows = positives.len() + negatives.len();
    let mut x = Vec::with_capacity(rows * width);
    let mut y = Vec::with_capacity(rows);
    for (pairs, label) in [(&positives, 1.0), (&negatives, 0.0)] {
        for &(u, v) in pairs {
            pair_features(&embeddings, embedding_dim, &features, u, v, &mut x);
            y.push(label);
        }
    }

    let (head, final_loss) = LogisticHead::fit(&x, &y, width, config, &deadline)?;
    tracing::debug!(
        positives = positives.len(),
        negatives = negatives.len(),
        loss = final_loss,
        elapsed_ms = deadline.elapsed().as_millis(),
        "trained link model"
    );

    Ok(LearnedLinkScorer {
        embeddings,
        embedding_dim,
        features,
        head,
        num_nodes: graph.node_count(),
        final_loss,
    })
}

/// Train on `graph` and return its top `k` candidate links.
///
/// `k == 0` is rejected before training starts.
pub fn predict_learned(
    graph: &Graph,
    config: &TrainingConfig,
    k: usize,
) -> Result<Vec<LinkPrediction>> {
    if k == 0 {
        return Err(Error::Core(socnet_core::Error::InvalidK(k)));
    }
    let scorer = train(graph, config)?;
    Ok(rank_links(graph, &scorer, k)?)
}
