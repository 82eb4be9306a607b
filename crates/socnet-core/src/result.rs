//! Result envelope shared by every analysis operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One analysis invocation: what ran, with which parameters, what it
/// produced, and when.
///
/// Built once and never mutated afterwards; the engine keeps no copy.
/// `warnings` is the side channel for failures that were recovered locally
/// (a metric that did not converge, a fallback scorer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult<T> {
    /// Algorithm tag, e.g. `"louvain"` or `"metrics"`.
    pub algorithm: String,
    /// Effective parameters.
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Algorithm-specific payload.
    pub output: T,
    /// Completion time.
    pub computed_at: DateTime<Utc>,
    /// Recovered failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> AnalysisResult<T> {
    /// Wrap `output`, stamped with the current time.
    pub fn new(algorithm: impl Into<String>, output: T) -> Self {
        Self {
            algorithm: algorithm.into(),
            parameters: BTreeMap::new(),
            output,
            computed_at: Utc::now(),
            warnings: Vec::new(),
        }
    }

    /// Record a parameter.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Append warnings.
    pub fn with_warnings<I, S>(mut self, warnings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warnings.extend(warnings.into_iter().map(Into::into));
        self
    }

    /// Whether any failure was recovered.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
