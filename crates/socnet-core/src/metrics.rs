//! Whole-graph metrics report.
//!
//! [`compute_metrics`] runs every metric family on one graph and gathers the
//! results into a [`MetricsReport`]. Families are independent and run in
//! parallel. A metric that can fail numerically (eigenvector centrality) is
//! reported as a [`MetricOutcome::Failed`] entry plus a warning; the rest of
//! the report is unaffected.
//!
//! Every figure is defined for empty and single-node graphs (zeros or empty
//! maps), so no caller needs to special-case tiny inputs.

use crate::algo::centrality::{
    betweenness_centrality, closeness_centrality, degree_scores, eigenvector_centrality,
    BetweennessConfig, ClosenessConfig, EigenvectorConfig, Scores,
};
use crate::algo::clustering::{clustering_coefficients, ClusteringReport};
use crate::algo::components::{component_stats, ComponentStats};
use crate::algo::distribution::{degree_distribution, DegreeDistribution};
use crate::error::{Error, ErrorKind, Result};
use crate::Graph;
use serde::{Deserialize, Serialize};

/// Edge density.
///
/// Undirected: `2|E| / (|V|(|V|-1))`. Directed: `|E| / (|V|(|V|-1))`.
/// Zero when `|V| <= 1`. Always within [0, 1].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn density(graph: &Graph) -> f64 {
    let n = graph.node_count();
    if n <= 1 {
        return 0.0;
    }
    let possible = (n * (n - 1)) as f64;
    let e = graph.edge_count() as f64;
    if graph.is_directed() {
        e / possible
    } else {
        2.0 * e / possible
    }
}

/// `2|E| / |V|`, zero for an empty graph.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_degree(graph: &Graph) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        0.0
    } else {
        2.0 * graph.edge_count() as f64 / n as f64
    }
}

/// Why a metric could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFailure {
    /// Error class.
    pub kind: ErrorKind,
    /// Rendered error.
    pub message: String,
    /// Steps taken, for iterative methods that did not settle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    /// Last step's change, for iterative methods that did not settle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual: Option<f64>,
}

impl From<&Error> for MetricFailure {
    fn from(e: &Error) -> Self {
        let (iterations, residual) = match *e {
            Error::NotConverged { iterations, residual } => (Some(iterations), Some(residual)),
            _ => (None, None),
        };
        Self {
            kind: e.kind(),
            message: e.to_string(),
            iterations,
            residual,
        }
    }
}

/// A metric that may fail without failing the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricOutcome<T> {
    /// The metric was computed.
    Computed(T),
    /// The metric failed.
    Failed(MetricFailure),
}

impl<T> MetricOutcome<T> {
    /// The value, if computed.
    pub fn value(&self) -> Option<&T> {
        match self {
            MetricOutcome::Computed(v) => Some(v),
            MetricOutcome::Failed(_) => None,
        }
    }

    /// The failure, if any.
    pub fn failure(&self) -> Option<&MetricFailure> {
        match self {
            MetricOutcome::Computed(_) => None,
            MetricOutcome::Failed(f) => Some(f),
        }
    }

    /// Whether the metric was computed.
    pub fn is_computed(&self) -> bool {
        matches!(self, MetricOutcome::Computed(_))
    }
}

impl<T> From<Result<T>> for MetricOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => MetricOutcome::Computed(v),
            Err(e) => MetricOutcome::Failed(MetricFailure::from(&e)),
        }
    }
}

/// All four centralities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityReport {
    /// Degree (normalized per config).
    pub degree: Scores,
    /// Betweenness.
    pub betweenness: Scores,
    /// Closeness.
    pub closeness: Scores,
    /// Eigenvector, or why it failed.
    pub eigenvector: MetricOutcome<Scores>,
}

/// Settings for [`compute_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Divide degree by `n - 1`.
    pub degree_normalized: bool,
    /// Betweenness settings.
    pub betweenness: BetweennessConfig,
    /// Closeness settings.
    pub closeness: ClosenessConfig,
    /// Eigenvector settings.
    pub eigenvector: EigenvectorConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            degree_normalized: true,
            betweenness: BetweennessConfig::default(),
            closeness: ClosenessConfig::default(),
            eigenvector: EigenvectorConfig::default(),
        }
    }
}

/// Everything [`compute_metrics`] reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// |V|.
    pub node_count: usize,
    /// |E|.
    pub edge_count: usize,
    /// Whether the graph is directed.
    pub directed: bool,
    /// See [`density`].
    pub density: f64,
    /// See [`average_degree`].
    pub average_degree: f64,
    /// Degree histogram.
    pub degree_distribution: DegreeDistribution,
    /// Local and average clustering.
    pub clustering: ClusteringReport,
    /// Component count and largest-component distances.
    pub components: ComponentStats,
    /// Centralities.
    pub centrality: CentralityReport,
    /// Recovered failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Compute the full metrics report.
///
/// ```rust
/// use socnet_core::Graph;
/// use socnet_core::metrics::{compute_metrics, MetricsConfig};
///
/// let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
/// let report = compute_metrics(&g, &MetricsConfig::default());
/// assert!((report.density - 2.0 / 3.0).abs() < 1e-12);
/// assert_eq!(report.components.largest_diameter, 2);
/// ```
#[must_use]
pub fn compute_metrics(graph: &Graph, config: &MetricsConfig) -> MetricsReport {
    let ((betweenness, closeness), (eigenvector, (clustering, components))) = rayon::join(
        || {
            rayon::join(
                || betweenness_centrality(graph, config.betweenness),
                || closeness_centrality(graph, config.closeness),
            )
        },
        || {
            rayon::join(
                || eigenvector_centrality(graph, config.eigenvector),
                || (clustering_coefficients(graph), component_stats(graph)),
            )
        },
    );

    let mut warnings = Vec::new();
    if let Err(e) = &eigenvector {
        tracing::warn!(error = %e, "eigenvector centrality failed");
        warnings.push(format!("eigenvector centrality: {e}"));
    }

    MetricsReport {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        directed: graph.is_directed(),
        density: density(graph),
        average_degree: average_degree(graph),
        degree_distribution: degree_distribution(graph),
        clustering,
        components,
        centrality: CentralityReport {
            degree: degree_scores(graph, config.degree_normalized),
            betweenness,
            closeness,
            eigenvector: eigenvector.into(),
        },
        warnings,
    }
}
