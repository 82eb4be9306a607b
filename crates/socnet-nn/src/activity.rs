//! Learned activity predictor, trained per request.
//!
//! Uses the same embeddings and node features as the link model, one row per
//! node instead of per pair:
//!
//! ```text
//! node u ─▶ [ embedding(u) | features(u) ] ─▶ regression head ─▶ σ(w·x + b)
//! ```
//!
//! The regression target is `degree / max_degree`, fitted by full-batch
//! gradient descent on mean squared error. Budget and failures follow the
//! link model: the [`Deadline`] is checked before every head epoch, and
//! every training failure is recoverable so the caller can fall back to
//! degree centrality.

use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::features::NodeFeatures;
use crate::link_model::{node_embeddings, TrainingConfig};
use socnet_core::algo::activity::{rank_activity, ActivityPrediction};
use socnet_core::Graph;

/// Sigmoid regression head over node rows.
#[derive(Debug, Clone, PartialEq)]
struct RegressionHead {
    weights: Vec<f64>,
    bias: f64,
}

impl RegressionHead {
    /// Full-batch gradient descent on mean squared error.
    ///
    /// `x` is row-major with `width` columns; targets lie in `[0, 1]`.
    fn fit(
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

            for (row, &target) in x.chunks_exact(width).zip(y) {
                let p = head.predict(row);
                let err = p - target;
                loss += err * err;
                let dz = 2.0 * err * p * (1.0 - p);
                for (g, xi) in grad_w.iter_mut().zip(row) {
                    *g += dz * xi;
                }
                grad_b += dz;
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

/// Activity scores fitted on one graph.
#[derive(Debug, Clone)]
pub struct LearnedActivityModel {
    scores: Vec<f64>,
    final_loss: f64,
}

impl LearnedActivityModel {
    /// Mean squared error after the last epoch.
    pub fn final_loss(&self) -> f64 {
        self.final_loss
    }

    /// Predicted activity per node, in index order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }
}

/// Fit activity scores on `graph`.
///
/// Fails with [`Error::InsufficientData`] on fewer than two nodes or fewer
/// than `min_edges` edges, [`Error::TrainingTimeout`] when the budget runs
/// out, and [`Error::Diverged`] on a non-finite loss.
pub fn train_activity(graph: &Graph, config: &TrainingConfig) -> Result<LearnedActivityModel> {
    config.validate()?;
    let deadline = Deadline::start(config.timeout());

    let n = graph.node_count();
    let edges = graph.edge_count();
    let required = config.min_edges.max(1);
    if n < 2 || edges < required {
        return Err(Error::InsufficientData(format!(
            "{n} nodes and {edges} edges, at least 2 nodes and {required} edges required"
        )));
    }

    let (embeddings, embedding_dim) = node_embeddings(graph, config, &deadline)?;
    let features = NodeFeatures::build(graph, config.features);
    let width = embedding_dim + features.width();

    let degrees: Vec<usize> = graph.node_indices().map(|idx| graph.degree(idx)).collect();
    let max_degree = degrees.iter().copied().max().unwrap_or(0).max(1) as f64;
    let y: Vec<f64> = degrees.iter().map(|&d| d as f64 / max_degree).collect();

    let mut x = Vec::with_capacity(n * width);
    for idx in graph.node_indices() {
        let start = idx.index() * embedding_dim;
        x.extend(embeddings[start..start + embedding_dim].iter().map(|&e| f64::from(e)));
        x.extend_from_slice(features.row(idx));
    }

    let (head, final_loss) = RegressionHead::fit(&x, &y, width, config, &deadline)?;
    let scores = x.chunks_exact(width).map(|row| head.predict(row)).collect();
    tracing::debug!(
        nodes = n,
        loss = final_loss,
        elapsed_ms = deadline.elapsed().as_millis(),
        "trained activity model"
    );

    Ok(LearnedActivityModel { scores, final_loss })
}

/// Train on `graph` and return its `k` most active members.
///
/// `k == 0` is rejected before training starts.
pub fn predict_activity_learned(
    graph: &Graph,
    config: &TrainingConfig,
    k: usize,
) -> Result<Vec<ActivityPrediction>> {
    if k == 0 {
        return Err(Error::Core(socnet_core::Error::InvalidK(k)));
    }
    let model = train_activity(graph, config)?;
    Ok(rank_activity(graph, model.scores(), k)?)
}
