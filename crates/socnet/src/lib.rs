//! Social network analysis engine.
//!
//! This crate is the front door: it re-exports `socnet-core` (graph model,
//! metrics, communities, heuristics, comparison) and adds the [`Engine`],
//! which applies an [`EngineConfig`] and the error-recovery policy:
//!
//! - construction and parameter errors are returned to the caller
//! - a metric that fails numerically becomes a warning; the rest of the report stands
//! - a learned link scorer that cannot train is replaced by a heuristic, with a warning
//! - a learned activity model that cannot train is replaced by degree centrality
//!
//! # Example
//!
//! ```rust
//! use socnet::{Engine, EngineConfig, IngestOptions, RawEdge};
//!
//! let engine = Engine::new(EngineConfig::default().with_ingest(
//!     IngestOptions::default().anonymized().with_implicit_nodes(),
//! ));
//! let graph = engine
//!     .ingest(Vec::new(), vec![RawEdge::new("alice", "bob"), RawEdge::new("bob", "carol")])
//!     .unwrap();
//!
//! let metrics = engine.compute_metrics(&graph);
//! assert!((metrics.output.density - 2.0 / 3.0).abs() < 1e-12);
//!
//! let links = engine.predict_links(&graph, 1).unwrap();
//! assert_eq!(links.output.predictions[0].score, 1.0);
//! ```

mod engine;
mod error;
pub mod predict;

pub use engine::{CommunityReport, Engine, EngineConfig};
pub use error::{Error, Result};
pub use predict::{ActivityMethod, ActivityReport, LinkMethod, LinkReport};

// Re-export core types
pub use socnet_core::{
    ingest, AnalysisResult, AttrValue, ComparisonResult, Edge, EdgeKey, ErrorKind, Graph,
    GraphBuilder,
    GraphData, GraphError, IngestOptions, Node, NodeId, RawEdge, RawNode, Snapshot, SnapshotMeta,
};

/// Analysis algorithms.
pub mod algo {
    pub use socnet_core::algo::*;
}

pub use socnet_core::{compare, generators, identity, metrics};

/// Learned link and activity prediction.
pub mod nn {
    pub use socnet_nn::*;
}

// Re-export petgraph for advanced graph operations
pub use socnet_core::petgraph;
