//! Eigenvector centrality: importance via important neighbors.
//!
//! # Intuition
//!
//! A node is important if it's connected to other important nodes.
//! This creates a recursive definition resolved by finding the
//! dominant eigenvector of the adjacency matrix.
//!
//! In a social network: popular people connected to popular people.
//!
//! # Definition
//!
//! ```text
//! x_v = (1/λ) × Σ_{u→v} x_u
//! ```
//!
//! Equivalently: Ax = λx, where λ is the largest eigenvalue.
//!
//! # Algorithm: Shifted Power Iteration
//!
//! 1. Initialize x uniformly
//! 2. Repeat: x' = (A + I) × x, then x' = x' / ||x'||
//! 3. Stop when ||x' - x|| < tolerance
//!
//! A + I has the same eigenvectors as A but no eigenvalue of equal
//! magnitude and opposite sign, so bipartite graphs (stars, paths, trees)
//! converge instead of oscillating.
//!
//! Directed graphs sum over in-edges. Edge weights are ignored.
//!
//! # Failure
//!
//! If the iteration has not settled after `max_iterations` steps the result
//! is [`Error::NotConverged`]. Callers batching several metrics treat this as
//! a failure of this one metric only.
//!
//! # References
//!
//! - Bonacich (1972). "Factoring and weighting approaches to status scores"
//! - Bonacich (1987). "Power and centrality: A family of measures"

use super::Scores;
use crate::error::{Error, Result};
use crate::Graph;
use serde::{Deserialize, Serialize};

/// Configuration for eigenvector centrality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenvectorConfig {
    /// Maximum iterations before giving up.
    pub max_iterations: usize,
    /// Convergence tolerance (L2 norm of change).
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

impl EigenvectorConfig {
    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::invalid("max_iterations", "must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::invalid(
                "tolerance",
                format!("must be positive, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// Compute eigenvector centrality via power iteration.
///
/// Scores are non-negative with unit L2 norm.
///
/// # Complexity
///
/// - Time: O((V + E) × iterations)
/// - Space: O(V)
///
/// # Example
///
/// ```
/// use socnet_core::Graph;
/// use socnet_core::algo::centrality::{eigenvector_centrality, EigenvectorConfig};
///
/// let g = Graph::from_pairs(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C")], false).unwrap();
/// let scores = eigenvector_centrality(&g, EigenvectorConfig::default()).unwrap();
/// assert!(scores[&"Hub".into()] > scores[&"A".into()]);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(graph: &Graph, config: EigenvectorConfig) -> Result<Scores> {
    config.validate()?;

    let n = graph.node_count();
    if n == 0 {
        return Ok(Scores::new());
    }

    // Initialize uniformly
    let init_val = 1.0 / (n as f64).sqrt();
    let mut scores = vec![init_val; n];
    let mut new_scores = vec![0.0; n];
    let mut residual = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        // (A + I) × x, summing over in-neighbors
        for idx in graph.node_indices() {
            let i = idx.index();
            new_scores[i] = scores[i]
                + graph
                    .in_neighbors(idx)
                    .iter()
                    .map(|pred| scores[pred.index()])
                    .sum::<f64>();
        }

        // Shifted matrix keeps x positive, so the norm is never zero.
        let norm: f64 = new_scores.iter().map(|x| x * x).sum::<f64>().sqrt();
        for s in &mut new_scores {
            *s /= norm;
        }

        residual = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(old, new)| (old - new).powi(2))
            .sum::<f64>()
            .sqrt();

        std::mem::swap(&mut scores, &mut new_scores);

        if residual < config.tolerance {
            tracing::debug!(iteration, residual, "eigenvector centrality converged");
            return Ok(graph
                .node_indices()
                .map(|idx| (graph.id_of(idx).clone(), scores[idx.index()]))
                .collect());
        }
    }

    Err(Error::NotConverged {
        iterations: config.max_iterations,
        residual,
    })
}
