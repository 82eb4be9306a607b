//! Algorithms for social-graph analysis.
//!
//! - **Centrality**: Measure node importance ([`centrality`])
//! - **Components**: Connected components and their distances ([`components`])
//! - **Clustering**: Local clustering coefficient ([`clustering`])
//! - **Degree distribution**: Histogram and summary ([`distribution`])
//! - **Communities**: Louvain, label propagation, Girvan-Newman ([`community`])
//! - **Link prediction**: Candidate ranking ([`link`])
//! - **Activity**: Most likely active members ([`activity`])
//!
//! Every function takes `&Graph` and returns a fresh value; nothing here
//! mutates its input, so any of them can run concurrently on one graph.

/// Activity prediction from degree.
pub mod activity;

/// Centrality algorithms for measuring node importance.
pub mod centrality;

/// Local clustering coefficient.
pub mod clustering;

/// Community detection.
pub mod community;

/// Connected components algorithm.
pub mod components;

/// Degree distribution.
pub mod distribution;

/// Link prediction.
pub mod link;

/// Shortest-path primitives.
pub mod paths;
