//! End-to-end analysis over ingested and generated graphs.

use socnet_core::algo::centrality::{centrality, rank_nodes, CentralityKind};
use socnet_core::algo::community::{detect, detect_by_name, CommunityAlgorithm, CommunityParams};
use socnet_core::algo::link::{predict_links, HeuristicKind};
use socnet_core::compare::{compare_snapshots, compare_with_partitions};
use socnet_core::generators::{barabasi_albert, watts_strogatz};
use socnet_core::identity::assign_id;
use socnet_core::metrics::{compute_metrics, MetricsConfig};
use socnet_core::{
    ingest, ErrorKind, GraphError, IngestOptions, RawEdge, RawNode, Snapshot, SnapshotMeta,
};

fn friendships(extra: &[(&str, &str)]) -> (Vec<RawNode>, Vec<RawEdge>) {
    let mut pairs = vec![
        ("alice", "bob"),
        ("bob", "carol"),
        ("alice", "carol"),
        ("dave", "erin"),
        ("erin", "frank"),
        ("dave", "frank"),
        ("carol", "dave"),
    ];
    pairs.extend_from_slice(extra);
    let edges = pairs.iter().map(|&(a, b)| RawEdge::new(a, b)).collect();
    (Vec::new(), edges)
}

#[test]
fn test_anonymized_pipeline() {
    let (nodes, edges) = friendships(&[]);
    let options = IngestOptions::default().anonymized().with_implicit_nodes();
    let g = ingest(nodes, edges, &options).unwrap();

    assert_eq!(g.node_count(), 6);
    assert!(g.contains_node(&assign_id("alice")));
    assert!(g.node_ids().all(|id| id.as_str() != "alice"));

    let report = compute_metrics(&g, &MetricsConfig::default());
    assert_eq!(report.components.count, 1);
    assert_eq!(report.components.largest_diameter, 3);

    let partition = detect(&g, CommunityAlgorithm::Louvain, &CommunityParams::default()).unwrap();
    assert_eq!(partition.community_count, 2);
    let alice = partition.community_of(&assign_id("alice")).unwrap();
    assert_eq!(partition.community_of(&assign_id("bob")), Some(alice));
    assert_ne!(partition.community_of(&assign_id("erin")), Some(alice));
}

#[test]
fn test_bridge_nodes_rank_highest() {
    let (nodes, edges) = friendships(&[]);
    let g = ingest(nodes, edges, &IngestOptions::default().with_implicit_nodes()).unwrap();
    let scores = centrality(&g, CentralityKind::Betweenness).unwrap();
    let top = rank_nodes(&scores, 2).unwrap();
    let mut ids: Vec<&str> = top.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["carol", "dave"]);
}

#[test]
fn test_missing_endpoint_is_rejected() {
    let nodes = vec![RawNode::new("alice")];
    let edges = vec![RawEdge::new("alice", "bob")];
    let err = ingest(nodes, edges, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, GraphError::DanglingEdge { .. }));
    assert_eq!(socnet_core::Error::from(err).kind(), ErrorKind::Construction);
}

#[test]
fn test_unknown_algorithm_is_a_parameter_error() {
    let g = watts_strogatz(10, 2, 0.0, 1).unwrap();
    let err = detect_by_name(&g, "spectral", &CommunityParams::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parameter);
}

#[test]
fn test_triadic_closure_is_predicted() {
    let (nodes, edges) = friendships(&[]);
    let g = ingest(nodes, edges, &IngestOptions::default().with_implicit_nodes()).unwrap();
    let top = predict_links(&g, HeuristicKind::AdamicAdar, 3).unwrap();
    assert_eq!(top.len(), 3);
    // every top candidate closes a path through a bridge node
    for p in &top {
        assert!(p.score > 0.0);
    }
}

#[test]
fn test_snapshot_evolution() {
    let options = IngestOptions::default().anonymized().with_implicit_nodes();
    let (n0, e0) = friendships(&[]);
    let (n1, e1) = friendships(&[("grace", "dave"), ("grace", "erin"), ("grace", "frank")]);
    let g0 = ingest(n0, e0, &options).unwrap();
    let g1 = ingest(n1, e1, &options).unwrap();

    let params = CommunityParams::default();
    let p0 = detect(&g0, CommunityAlgorithm::Louvain, &params).unwrap();
    let p1 = detect(&g1, CommunityAlgorithm::Louvain, &params).unwrap();
    let diff = compare_with_partitions(&g0, &g1, &p0, &p1).unwrap();

    assert_eq!(diff.node_delta.added, vec![assign_id("grace")]);
    assert!(diff.node_delta.removed.is_empty());
    assert_eq!(diff.edge_delta.added.len(), 3);
    assert_eq!(diff.growth.edge_count_delta, 3);

    let delta = diff.community_delta.unwrap();
    assert_eq!(delta.count_before, 2);
    assert_eq!(delta.count_after, 2);
    let grown = delta.top_growing(1);
    assert_eq!(grown[0].size_after, 4);

    let t = chrono::Utc::now();
    let labelled = compare_snapshots(
        &Snapshot::new(SnapshotMeta::new("s0", t), g0),
        &Snapshot::new(SnapshotMeta::new("s1", t), g1),
    );
    assert_eq!(labelled.after.map(|m| m.id), Some("s1".to_string()));
}

#[test]
fn test_generated_graphs_analyze() {
    let g = barabasi_albert(200, 2, 11).unwrap();
    let report = compute_metrics(&g, &MetricsConfig::default());
    assert_eq!(report.node_count, 200);
    assert_eq!(report.components.count, 1);
    assert!(report.degree_distribution.max >= 6);

    let ring = watts_strogatz(60, 6, 0.0, 5).unwrap();
    let clustering = compute_metrics(&ring, &MetricsConfig::default()).clustering.average;
    // C(k) = 3(k-2) / 4(k-1) for a ring lattice
    assert!((clustering - 0.6).abs() < 1e-9);
}
