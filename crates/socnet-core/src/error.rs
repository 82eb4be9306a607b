//! Error types for socnet-core.
//!
//! Two layers:
//!
//! - [`GraphError`]: construction failures. A graph is either built whole or
//!   not at all, so every variant rejects the entire input.
//! - [`Error`]: everything an analysis can report. Construction errors convert
//!   into it via `?`.

use crate::NodeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection reasons for [`Graph::build`](crate::Graph::build) and [`ingest`](crate::ingest).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Two node records resolved to the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// An edge references a node that is not part of the graph.
    #[error("edge {source_id} -> {target_id} references missing node {missing}")]
    DanglingEdge {
        /// Edge source.
        source_id: NodeId,
        /// Edge target.
        target_id: NodeId,
        /// The endpoint that could not be resolved.
        missing: NodeId,
    },

    /// Source and target are the same node.
    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),

    /// Weight is zero, negative, or not a finite number.
    #[error("edge {source_id} -> {target_id} has non-positive weight {weight}")]
    NegativeWeight {
        /// Edge source.
        source_id: NodeId,
        /// Edge target.
        target_id: NodeId,
        /// Offending weight.
        weight: f64,
    },
}

/// Coarse classification used by callers to pick a propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid input graph; surfaced verbatim.
    Construction,
    /// Invalid request parameters; surfaced verbatim, raised before any work.
    Parameter,
    /// An iterative method did not settle; recoverable per metric.
    Numerical,
    /// A time or resource budget ran out; recoverable with a fallback.
    Resource,
}

/// Analysis errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Graph construction failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Algorithm tag not recognised by the requested family.
    #[error("unknown {family} algorithm: {name}")]
    UnknownAlgorithm {
        /// Algorithm family ("community", "centrality", "link").
        family: &'static str,
        /// The tag that failed to resolve.
        name: String,
    },

    /// Requested result count is not usable.
    #[error("invalid k: {0} (must be at least 1)")]
    InvalidK(usize),

    /// A parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What constraint was violated.
        reason: String,
    },

    /// Power iteration ran out of steps.
    #[error("did not converge after {iterations} iterations (residual {residual:e})")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
        /// L2 change on the final step.
        residual: f64,
    },
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Graph(_) => ErrorKind::Construction,
            Error::UnknownAlgorithm { .. }
            | Error::InvalidK(_)
            | Error::InvalidParameter { .. } => ErrorKind::Parameter,
            Error::NotConverged { .. } => ErrorKind::Numerical,
        }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for socnet-core operations.
pub type Result<T> = std::result::Result<T, Error>;
