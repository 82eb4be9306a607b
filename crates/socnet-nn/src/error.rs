//! Error types for socnet-nn.

use socnet_core::ErrorKind;
use std::time::Duration;
use thiserror::Error;

/// Training failures.
///
/// Everything except [`Error::Core`] is recoverable: the caller is expected
/// to fall back to a heuristic scorer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Training ran past its time budget.
    #[error(
        "training exceeded its {budget:?} budget after {elapsed:?} \
         ({epochs_completed} epochs completed)"
    )]
    TrainingTimeout {
        /// Time spent when the deadline was noticed.
        elapsed: Duration,
        /// Configured budget.
        budget: Duration,
        /// Link-head epochs finished before the deadline.
        epochs_completed: usize,
    },

    /// Not enough positives or negatives to learn from.
    #[error("insufficient training data: {0}")]
    InsufficientData(String),

    /// The loss stopped being a finite number.
    #[error("training diverged at epoch {epoch}")]
    Diverged {
        /// Epoch at which the loss became non-finite.
        epoch: usize,
    },

    /// Invalid configuration or graph.
    #[error(transparent)]
    Core(#[from] socnet_core::Error),
}

impl Error {
    /// Whether a heuristic fallback is appropriate.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Core(_))
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TrainingTimeout { .. } | Error::InsufficientData(_) => ErrorKind::Resource,
            Error::Diverged { .. } => ErrorKind::Numerical,
            Error::Core(e) => e.kind(),
        }
    }
}

/// Result type for socnet-nn operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        let timeout = Error::TrainingTimeout {
            elapsed: Duration::from_millis(12),
            budget: Duration::from_millis(10),
            epochs_completed: 3,
        };
        assert!(timeout.is_recoverable());
        assert_eq!(timeout.kind(), ErrorKind::Resource);
        assert!(Error::Diverged { epoch: 1 }.is_recoverable());

        let core = Error::from(socnet_core::Error::InvalidK(0));
        assert!(!core.is_recoverable());
        assert_eq!(core.kind(), ErrorKind::Parameter);
    }
}
