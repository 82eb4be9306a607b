//! Property-based tests for socnet-core.
//!
//! These tests verify invariants that should hold for any social graph:
//! - Metric bounds (density, clustering, centrality)
//! - Partition coverage and modularity range
//! - Link-prediction output contract
//! - Snapshot self-comparison and identity stability

use proptest::prelude::*;
use socnet_core::{Graph, GraphBuilder};

/// Undirected graph on `1..max_n` nodes with arbitrary edges.
fn arb_graph(max_n: usize, max_edges: usize) -> impl Strategy<Value = Graph> {
    (1..max_n).prop_flat_map(move |n| {
        prop::collection::vec((0..n, 0..n), 0..max_edges).prop_map(move |pairs| {
            let mut builder = GraphBuilder::undirected();
            for i in 0..n {
                builder = builder.node(format!("n{i:02}"));
            }
            for (a, b) in pairs.into_iter().filter(|(a, b)| a != b) {
                builder = builder.edge(format!("n{a:02}"), format!("n{b:02}"));
            }
            builder.build().unwrap()
        })
    })
}

mod metric_props {
    use super::*;
    use socnet_core::algo::centrality::{
        betweenness_centrality, closeness_centrality, BetweennessConfig, ClosenessConfig,
    };
    use socnet_core::algo::clustering::clustering_coefficients;
    use socnet_core::algo::distribution::degree_distribution;
    use socnet_core::metrics::density;
    use socnet_core::petgraph::graph::NodeIndex;
    use std::collections::VecDeque;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn density_within_unit_interval(g in arb_graph(15, 60)) {
            let d = density(&g);
            prop_assert!((0.0..=1.0).contains(&d), "density {} out of range", d);
        }

        #[test]
        fn histogram_counts_every_node(g in arb_graph(15, 40)) {
            let dist = degree_distribution(&g);
            prop_assert_eq!(dist.histogram.values().sum::<usize>(), g.node_count());
        }

        #[test]
        fn clustering_within_unit_interval(g in arb_graph(15, 60)) {
            let report = clustering_coefficients(&g);
            prop_assert!(report.local.values().all(|c| (0.0..=1.0).contains(c)));
            prop_assert!((0.0..=1.0).contains(&report.average));
        }

        #[test]
        fn centralities_cover_every_node(g in arb_graph(12, 40)) {
            let b = betweenness_centrality(&g, BetweennessConfig::default());
            let c = closeness_centrality(&g, ClosenessConfig::default());
            prop_assert_eq!(b.len(), g.node_count());
            prop_assert_eq!(c.len(), g.node_count());
            prop_assert!(b.values().all(|&x| x >= 0.0 && x <= 1.0 + 1e-9));
            prop_assert!(c.values().all(|&x| x >= 0.0 && x.is_finite()));
        }

        #[test]
        fn closeness_falls_with_distance(g in arb_connected_graph(20, 30)) {
            let scores = closeness_centrality(&g, ClosenessConfig::default());
            let totals: Vec<usize> = g.node_indices().map(|v| total_distance(&g, v)).collect();
            for u in g.node_indices() {
                for v in g.node_indices() {
                    if g.degree(u) == g.degree(v) && totals[u.index()] > totals[v.index()] {
                        let (cu, cv) = (scores[g.id_of(u)], scores[g.id_of(v)]);
                        prop_assert!(cu <= cv, "{} (sum {}) = {} > {} (sum {}) = {}",
                            g.id_of(u), totals[u.index()], cu, g.id_of(v), totals[v.index()], cv);
                    }
                }
            }
        }
    }

    /// A path through every node plus arbitrary chords, so the graph is connected.
    fn arb_connected_graph(max_n: usize, max_chords: usize) -> impl Strategy<Value = Graph> {
        (2..max_n, any::<bool>()).prop_flat_map(move |(n, ring)| {
            prop::collection::vec((0..n, 0..n), 0..max_chords).prop_map(move |chords| {
                let mut builder = GraphBuilder::undirected();
                for i in 0..n {
                    builder = builder.node(format!("n{i:02}"));
                }
                for i in 1..n {
                    builder = builder.edge(format!("n{:02}", i - 1), format!("n{i:02}"));
                }
                if ring && n > 2 {
                    builder = builder.edge(format!("n{:02}", n - 1), "n00");
                }
                for (a, b) in chords.into_iter().filter(|(a, b)| a != b) {
                    builder = builder.edge(format!("n{a:02}"), format!("n{b:02}"));
                }
                builder.build().unwrap()
            })
        })
    }

    /// Sum of hop distances from `source` to every other node.
    fn total_distance(g: &Graph, source: NodeIndex) -> usize {
        let mut dist = vec![usize::MAX; g.node_count()];
        dist[source.index()] = 0;
        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            for &w in g.neighbors(v) {
                if dist[w.index()] == usize::MAX {
                    dist[w.index()] = dist[v.index()] + 1;
                    queue.push_back(w);
                }
            }
        }
        dist.into_iter().sum()
    }
}

mod community_props {
    use super::*;
    use socnet_core::algo::community::{detect, CommunityAlgorithm, CommunityParams};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn partitions_are_dense_and_total(g in arb_graph(12, 30)) {
            for algorithm in CommunityAlgorithm::ALL {
                let p = detect(&g, algorithm, &CommunityParams::default()).unwrap();
                prop_assert_eq!(p.assignment.len(), g.node_count());
                let sizes = p.sizes();
                prop_assert_eq!(sizes.len(), p.community_count);
                prop_assert!(
                    sizes.iter().all(|&s| s > 0),
                    "{:?} left an empty community",
                    algorithm
                );
                prop_assert!(
                    (-0.5 - 1e-9..=1.0 + 1e-9).contains(&p.modularity),
                    "{:?} modularity {}", algorithm, p.modularity
                );
            }
        }

        #[test]
        fn detection_is_deterministic(g in arb_graph(12, 30)) {
            for algorithm in CommunityAlgorithm::ALL {
                let a = detect(&g, algorithm, &CommunityParams::default()).unwrap();
                let b = detect(&g, algorithm, &CommunityParams::default()).unwrap();
                prop_assert_eq!(a, b);
            }
        }
    }
}

mod link_props {
    use super::*;
    use socnet_core::algo::link::{predict_links, HeuristicKind};
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn predictions_respect_contract(g in arb_graph(12, 30), k in 1usize..20) {
            for heuristic in HeuristicKind::ALL {
                let top = predict_links(&g, heuristic, k).unwrap();
                prop_assert!(top.len() <= k);

                let mut seen = HashSet::new();
                for p in &top {
                    prop_assert!(p.source < p.target);
                    prop_assert!(!g.contains_edge(&p.source, &p.target));
                    prop_assert!(!g.contains_edge(&p.target, &p.source));
                    prop_assert!(seen.insert((p.source.clone(), p.target.clone())));
                }
                for w in top.windows(2) {
                    prop_assert!(
                        w[0].score > w[1].score
                            || (w[0].score == w[1].score
                                && (&w[0].source, &w[0].target) < (&w[1].source, &w[1].target))
                    );
                }
            }
        }
    }
}

mod snapshot_props {
    use super::*;
    use socnet_core::compare::compare;
    use socnet_core::identity::assign_id;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn self_comparison_is_empty(g in arb_graph(15, 40)) {
            let diff = compare(&g, &g);
            prop_assert!(diff.node_delta.added.is_empty());
            prop_assert!(diff.node_delta.removed.is_empty());
            prop_assert!(diff.edge_delta.added.is_empty());
            prop_assert!(diff.edge_delta.removed.is_empty());
            prop_assert_eq!(diff.growth.node_count_delta, 0);
            prop_assert_eq!(diff.growth.density_delta, 0.0);
            prop_assert_eq!(diff.similarity.node_jaccard, 1.0);
        }

        #[test]
        fn ids_are_stable_hex(raw in ".{0,40}") {
            let a = assign_id(&raw);
            prop_assert_eq!(&a, &assign_id(&raw));
            prop_assert_eq!(a.as_str().len(), 64);
            prop_assert!(a
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }

        #[test]
        fn graph_json_roundtrip(g in arb_graph(10, 20)) {
            let json = serde_json::to_string(&g).unwrap();
            let back: Graph = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, g);
        }
    }
}
