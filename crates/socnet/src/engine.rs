//! The analysis engine.
//!
//! [`Engine`] is a thin, stateless front over the core algorithms: it holds
//! an [`EngineConfig`], applies it, and wraps every output in an
//! [`AnalysisResult`] carrying the algorithm tag, effective parameters,
//! timestamp and warnings.
//!
//! | Operation | Output | Fails on |
//! |-----------|--------|----------|
//! | [`Engine::ingest`] | [`Graph`] | construction errors |
//! | [`Engine::compute_metrics`] | [`MetricsReport`] | never (failed metrics become warnings) |
//! | [`Engine::detect_communities`] | [`CommunityReport`] | unknown algorithm, bad params |
//! | [`Engine::predict_links`] | [`LinkReport`] | `k == 0`, bad training config |
//! | [`Engine::predict_activity`] | [`ActivityReport`] | `k == 0`, bad training config |
//! | [`Engine::compare_snapshots`] | [`ComparisonResult`] | bad community params |
//!
//! The engine keeps no per-request state, so one instance can serve any
//! number of concurrent callers.

use crate::error::Result;
use crate::predict::{
    predict, predict_activity, ActivityMethod, ActivityReport, LinkMethod, LinkReport,
};
use serde::{Deserialize, Serialize};
use socnet_core::algo::community::{
    detect, AnnotatedNode, CommunityAlgorithm, CommunityParams, Partition,
};
use socnet_core::algo::link::HeuristicKind;
use socnet_core::compare::{compare_with_partitions, ComparisonResult, Snapshot};
use socnet_core::metrics::{compute_metrics, MetricsConfig, MetricsReport};
use socnet_core::{ingest, AnalysisResult, Graph, IngestOptions, RawEdge, RawNode};
use socnet_nn::TrainingConfig;

/// Engine settings. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ingestion switches.
    pub ingest: IngestOptions,
    /// Metric settings.
    pub metrics: MetricsConfig,
    /// Detector used by [`Engine::compare_snapshots`] and as the default.
    pub community_algorithm: CommunityAlgorithm,
    /// Detector parameters.
    pub community: CommunityParams,
    /// Default link scoring method.
    pub link_method: LinkMethod,
    /// Heuristic used when the learned scorer is unavailable.
    pub fallback_heuristic: HeuristicKind,
    /// Default number of predicted links.
    pub predict_top_k: usize,
    /// Default activity prediction method.
    pub activity_method: ActivityMethod,
    /// Learned scorer settings, shared by the activity model.
    pub training: TrainingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ingest: IngestOptions::default(),
            metrics: MetricsConfig::default(),
            community_algorithm: CommunityAlgorithm::Louvain,
            community: CommunityParams::default(),
            link_method: LinkMethod::default(),
            fallback_heuristic: HeuristicKind::Jaccard,
            predict_top_k: 10,
            activity_method: ActivityMethod::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields take their defaults.
    ///
    /// ```rust
    /// use socnet::{EngineConfig, LinkMethod};
    ///
    /// let json = r#"{"link_method": "learned", "predict_top_k": 5}"#;
    /// let config = EngineConfig::from_json(json).unwrap();
    /// assert_eq!(config.link_method, LinkMethod::Learned);
    /// assert_eq!(config.predict_top_k, 5);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the ingestion options.
    pub fn with_ingest(mut self, ingest: IngestOptions) -> Self {
        self.ingest = ingest;
        self
    }

    /// Set the default community detector.
    pub fn with_community_algorithm(mut self, algorithm: CommunityAlgorithm) -> Self {
        self.community_algorithm = algorithm;
        self
    }

    /// Set the default link method.
    pub fn with_link_method(mut self, method: LinkMethod) -> Self {
        self.link_method = method;
        self
    }

    /// Set the fallback heuristic.
    pub fn with_fallback_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.fallback_heuristic = heuristic;
        self
    }

    /// Set the default activity method.
    pub fn with_activity_method(mut self, method: ActivityMethod) -> Self {
        self.activity_method = method;
        self
    }

    /// Set the learned scorer settings.
    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }
}

/// Communities of one graph: the partition and a tagged copy of the nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityReport {
    /// Id-to-community mapping with modularity.
    pub partition: Partition,
    /// Node records with their `group`; the input graph is untouched.
    pub nodes: Vec<AnnotatedNode>,
}

/// Stateless analysis front end.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Engine with the given settings.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a graph from raw records with the configured ingestion options.
    pub fn ingest(&self, raw_nodes: Vec<RawNode>, raw_edges: Vec<RawEdge>) -> Result<Graph> {
        Ok(ingest(raw_nodes, raw_edges, &self.config.ingest)?)
    }

    /// Every metric family; failed metrics show up as warnings.
    pub fn compute_metrics(&self, graph: &Graph) -> AnalysisResult<MetricsReport> {
        let report = compute_metrics(graph, &self.config.metrics);
        let warnings = report.warnings.clone();
        AnalysisResult::new("metrics", report)
            .with_parameter("degree_normalized", self.config.metrics.degree_normalized)
            .with_parameter("betweenness_normalized", self.config.metrics.betweenness.normalized)
            .with_parameter("closeness_variant", self.config.metrics.closeness.variant.as_str())
            .with_parameter(
                "eigenvector_max_iterations",
                self.config.metrics.eigenvector.max_iterations,
            )
            .with_parameter("eigenvector_tolerance", self.config.metrics.eigenvector.tolerance)
            .with_warnings(warnings)
    }

    /// Partition `graph` with `algorithm`.
    pub fn detect_communities(
        &self,
        graph: &Graph,
        algorithm: CommunityAlgorithm,
        params: &CommunityParams,
    ) -> Result<AnalysisResult<CommunityReport>> {
        let partition = detect(graph, algorithm, params)?;
        let nodes = partition.annotate(graph);
        tracing::debug!(
            algorithm = %algorithm,
            communities = partition.community_count,
            modularity = partition.modularity,
            "detected communities"
        );
        Ok(community_result(algorithm, params, CommunityReport { partition, nodes }))
    }

    /// [`Engine::detect_communities`] with the algorithm named by tag.
    pub fn detect_communities_by_name(
        &self,
        graph: &Graph,
        algorithm: &str,
        params: &CommunityParams,
    ) -> Result<AnalysisResult<CommunityReport>> {
        let algorithm: CommunityAlgorithm = algorithm.parse()?;
        self.detect_communities(graph, algorithm, params)
    }

    /// Top `k` links with the configured method.
    pub fn predict_links(&self, graph: &Graph, k: usize) -> Result<AnalysisResult<LinkReport>> {
        self.predict_links_with(graph, self.config.link_method, k)
    }

    /// Top `predict_top_k` links with the configured method.
    pub fn predict_default_links(&self, graph: &Graph) -> Result<AnalysisResult<LinkReport>> {
        self.predict_links(graph, self.config.predict_top_k)
    }

    /// Top `k` links with an explicit method.
    pub fn predict_links_with(
        &self,
        graph: &Graph,
        method: LinkMethod,
        k: usize,
    ) -> Result<AnalysisResult<LinkReport>> {
        let report = predict(
            graph,
            method,
            self.config.fallback_heuristic,
            &self.config.training,
            k,
        )?;
        let warnings: Vec<String> = report
            .fallback
            .iter()
            .map(|reason| format!("{method} scorer unavailable ({reason}); used {}", report.scorer))
            .collect();

        let mut result = AnalysisResult::new(method.to_string(), report)
            .with_parameter("k", k)
            .with_parameter("fallback_heuristic", self.config.fallback_heuristic.as_str())
            .with_warnings(warnings);
        if method == LinkMethod::Learned {
            result = self.training_parameters(result);
        }
        Ok(result)
    }

    /// The `k` most active members with the configured method.
    pub fn predict_activity(
        &self,
        graph: &Graph,
        k: usize,
    ) -> Result<AnalysisResult<ActivityReport>> {
        self.predict_activity_with(graph, self.config.activity_method, k)
    }

    /// The `k` most active members with an explicit method.
    pub fn predict_activity_with(
        &self,
        graph: &Graph,
        method: ActivityMethod,
        k: usize,
    ) -> Result<AnalysisResult<ActivityReport>> {
        let report = predict_activity(graph, method, &self.config.training, k)?;
        let warnings: Vec<String> = report
            .fallback
            .iter()
            .map(|reason| format!("{method} activity model unavailable ({reason}); used degree"))
            .collect();

        let mut result = AnalysisResult::new(format!("activity_{method}"), report)
            .with_parameter("k", k)
            .with_warnings(warnings);
        if method == ActivityMethod::Learned {
            result = self.training_parameters(result);
        }
        Ok(result)
    }

    fn training_parameters<T>(&self, result: AnalysisResult<T>) -> AnalysisResult<T> {
        let training = &self.config.training;
        result
            .with_parameter("embedding_dim", training.skipgram.embedding_dim)
            .with_parameter("head_epochs", training.head_epochs)
            .with_parameter("timeout_ms", training.timeout_ms)
            .with_parameter("seed", training.seed)
    }

    /// Diff two snapshots, including community evolution under the
    /// configured detector.
    pub fn compare_snapshots(
        &self,
        before: &Snapshot,
        after: &Snapshot,
    ) -> Result<AnalysisResult<ComparisonResult>> {
        let algorithm = self.config.community_algorithm;
        let params = &self.config.community;
        let pa = detect(&before.graph, algorithm, params)?;
        let pb = detect(&after.graph, algorithm, params)?;

        let mut comparison = compare_with_partitions(&before.graph, &after.graph, &pa, &pb)?;
        comparison.before = Some(before.meta.clone());
        comparison.after = Some(after.meta.clone());
        let warnings = comparison.warnings.clone();

        Ok(AnalysisResult::new("compare", comparison)
            .with_parameter("community_algorithm", algorithm.as_str())
            .with_parameter("before", before.meta.id.as_str())
            .with_parameter("after", after.meta.id.as_str())
            .with_warnings(warnings))
    }
}

fn community_result(
    algorithm: CommunityAlgorithm,
    params: &CommunityParams,
    report: CommunityReport,
) -> AnalysisResult<CommunityReport> {
    let mut result = AnalysisResult::new(algorithm.as_str(), report)
        .with_parameter("max_iterations", params.max_iterations)
        .with_parameter("resolution", params.resolution);
    if let Some(target) = params.target_communities {
        result = result.with_parameter("target_communities", target);
    }
    if let Some(threshold) = params.modularity_threshold {
        result = result.with_parameter("modularity_threshold", threshold);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use socnet_core::ErrorKind;

    fn bridged() -> Graph {
        Graph::from_pairs(
            &[("a", "b"), ("b", "c"), ("a", "c"), ("x", "y"), ("y", "z"), ("x", "z"), ("c", "x")],
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_metrics_envelope() {
        let result = Engine::default().compute_metrics(&bridged());
        assert_eq!(result.algorithm, "metrics");
        assert_eq!(result.parameters["degree_normalized"], true);
        assert!(!result.has_warnings());
        assert_eq!(result.output.node_count, 6);
    }

    #[test]
    fn test_communities_annotate_a_copy() {
        let g = bridged();
        let result = Engine::default()
            .detect_communities(
                &g,
                CommunityAlgorithm::LabelPropagation,
                &CommunityParams::default(),
            )
            .unwrap();
        assert_eq!(result.algorithm, "label_propagation");
        assert_eq!(result.output.nodes.len(), 6);
        assert!(result.output.nodes.iter().all(|n| n.group.is_some()));
        assert_eq!(g, bridged());
    }

    #[test]
    fn test_unknown_community_algorithm() {
        let err = Engine::default()
            .detect_communities_by_name(&bridged(), "infomap", &CommunityParams::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parameter);
    }

    #[test]
    fn test_fallback_is_a_warning() {
        let engine = Engine::new(EngineConfig::default().with_link_method(LinkMethod::Learned));
        let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
        let result = engine.predict_links(&g, 1).unwrap();
        assert_eq!(result.algorithm, "learned");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.output.scorer, "jaccard");
    }

    #[test]
    fn test_activity_envelope() {
        let result = Engine::default().predict_activity(&bridged(), 2).unwrap();
        assert_eq!(result.algorithm, "activity_degree");
        assert_eq!(result.parameters["k"], 2);
        assert!(!result.has_warnings());
        let ids: Vec<&str> = result.output.predictions.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "x"]);
    }

    #[test]
    fn test_activity_fallback_is_a_warning() {
        let engine =
            Engine::new(EngineConfig::default().with_activity_method(ActivityMethod::Learned));
        let g = Graph::from_pairs(&[("A", "B"), ("B", "C")], false).unwrap();
        let result = engine.predict_activity(&g, 2).unwrap();
        assert_eq!(result.algorithm, "activity_learned");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.output.fell_back());
        assert_eq!(result.output.predictions[0].id.as_str(), "B");
        assert_eq!(result.parameters["head_epochs"], 100);
    }

    #[test]
    fn test_bad_config_json() {
        let err = EngineConfig::from_json(r#"{"link_method": "oracle"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.kind(), ErrorKind::Parameter);
    }

    #[test]
    fn test_config_roundtrip() {
        let config =
            EngineConfig::default().with_community_algorithm(CommunityAlgorithm::GirvanNewman);
        let json = serde_json::to_string(&config).unwrap();
        let back = EngineConfig::from_json(&json).unwrap();
        assert_eq!(back.community_algorithm, CommunityAlgorithm::GirvanNewman);
        assert_eq!(back.link_method, config.link_method);
        assert_eq!(back.predict_top_k, 10);
        assert_eq!(back.activity_method, ActivityMethod::Degree);
        assert_eq!(back.training.head_epochs, config.training.head_epochs);
    }
}
