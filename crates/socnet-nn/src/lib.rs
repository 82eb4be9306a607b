// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

//! Learned link and activity prediction for socnet.
//!
//! Trains a small model against one graph, per request, and exposes it as a
//! [`socnet_core::algo::link::LinkScorer`] so it plugs into the same
//! candidate ranking as the heuristics. The activity model reuses the same
//! embeddings with a per-node regression head.
//!
//! - [`walks`] - seeded node2vec random walks
//! - [`skipgram`] - skip-gram embeddings with negative sampling
//! - [`features`] - degree / attribute node features and symmetric pair vectors
//! - [`link_model`] - logistic link head, training under a deadline
//! - [`activity`] - per-node activity regression on the same embeddings
//!
//! # Failure is expected
//!
//! Training can legitimately fail: tiny graphs have nothing to learn from,
//! and a tight budget can run out. Every such failure is an [`Error`] with
//! [`Error::is_recoverable`] true, and the caller falls back to a heuristic.
//!
//! ```rust
//! use socnet_core::Graph;
//! use socnet_nn::{predict_learned, TrainingConfig};
//!
//! let g = Graph::from_pairs(
//!     &[("a", "b"), ("b", "c"), ("a", "c"), ("c", "d"), ("d", "e"), ("e", "f"), ("d", "f")],
//!     false,
//! )
//! .unwrap();
//! let top = predict_learned(&g, &TrainingConfig::default(), 3).unwrap();
//! assert_eq!(top.len(), 3);
//! assert!(top.iter().all(|p| (0.0..=1.0).contains(&p.score)));
//! ```

pub mod activity;
mod deadline;
pub mod error;
pub mod features;
pub mod link_model;
pub mod skipgram;
pub mod walks;

pub use activity::{predict_activity_learned, train_activity, LearnedActivityModel};
pub use deadline::Deadline;
pub use error::{Error, Result};
pub use features::FeatureSource;
pub use link_model::{predict_learned, train, LearnedLinkScorer, TrainingConfig};
pub use skipgram::SkipGramConfig;
pub use walks::WalkConfig;
