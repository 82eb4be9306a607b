// Allow minor clippy style warnings at crate level
// These are mostly style preferences, not bugs
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::many_single_char_names)]

//! Core types and algorithms for social-network analysis.
//!
//! - [`Graph`] - An immutable, validated social graph
//! - [`identity`] - Deterministic SHA-256 node ids and anonymization
//! - [`ingest`] - Raw records to [`Graph`]
//! - [`metrics`] - Density, degree, clustering, components, centrality
//! - [`algo::community`] - Louvain, label propagation, Girvan-Newman
//! - [`algo::link`] - Link-prediction heuristics and candidate ranking
//! - [`compare`] - Diffing two snapshots of the same network
//! - [`generators`] - Seeded synthetic graphs
//!
//! # From People to Graphs
//!
//! A social network reduces to people (nodes) and ties (edges). Everything
//! else is attached data:
//!
//! ```text
//! (alice) --follows--> (bob)        directed: follower graphs
//! (alice) ---friend--- (bob)        undirected: friendship graphs
//! ```
//!
//! A [`Graph`] fixes its directedness at construction. Algorithms that are
//! only meaningful on undirected structure (clustering, components,
//! community detection, link prediction) read the *undirected view*: every
//! edge taken in both directions, parallel orientations merged.
//!
//! # Identity
//!
//! Analyses of the same network taken months apart are only comparable when
//! the same person gets the same id. [`identity::assign_id`] derives the id
//! from the external identifier with SHA-256, so it is stable across runs
//! and machines, and the raw identifier never enters the graph.
//!
//! | Input | Id |
//! |-------|----|
//! | `"abc"` | `ba7816bf8f01cfea…` (64 hex chars) |
//!
//! # Determinism
//!
//! Nodes are kept sorted by id and every algorithm breaks ties by id, so the
//! same graph and parameters always produce the same output. Parallel
//! sections (betweenness, closeness, candidate scoring) only parallelize
//! independent work and merge results in index order.
//!
//! # Quick Start
//!
//! ```rust
//! use socnet_core::Graph;
//! use socnet_core::algo::community::{detect, CommunityAlgorithm, CommunityParams};
//! use socnet_core::metrics::{compute_metrics, MetricsConfig};
//!
//! let g = Graph::from_pairs(
//!     &[("a", "b"), ("b", "c"), ("a", "c"), ("x", "y"), ("y", "z"), ("x", "z"), ("c", "x")],
//!     false,
//! )
//! .unwrap();
//!
//! let report = compute_metrics(&g, &MetricsConfig::default());
//! assert_eq!(report.components.count, 1);
//!
//! let partition = detect(&g, CommunityAlgorithm::Louvain, &CommunityParams::default()).unwrap();
//! assert_eq!(partition.community_count, 2);
//! ```

pub mod algo;
pub mod compare;
pub mod edge;
pub mod error;
pub mod generators;
pub mod graph;
pub mod identity;
pub mod ingest;
pub mod metrics;
pub mod node;
pub mod result;

pub use compare::{ComparisonResult, Snapshot, SnapshotMeta};
pub use edge::{Edge, EdgeKey};
pub use error::{Error, ErrorKind, GraphError, Result};
pub use graph::{Graph, GraphBuilder, GraphData};
pub use ingest::{ingest, IngestOptions, RawEdge, RawNode};
pub use node::{AttrValue, Node, NodeId};
pub use result::AnalysisResult;

// Re-export petgraph for downstream users
pub use petgraph;
