use socnet_core::{ErrorKind, GraphError};
use thiserror::Error;

/// Errors surfaced by the [`Engine`](crate::Engine).
///
/// Numerical and training failures never appear here; they are recovered
/// inside the engine and reported as warnings.
#[derive(Error, Debug)]
pub enum Error {
    /// Construction or parameter error from the analysis core.
    #[error(transparent)]
    Core(#[from] socnet_core::Error),

    /// Engine configuration could not be parsed.
    #[error("invalid engine config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<GraphError> for Error {
    fn from(e: GraphError) -> Self {
        Error::Core(e.into())
    }
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(e) => e.kind(),
            Error::Config(_) => ErrorKind::Parameter,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
