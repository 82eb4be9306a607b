//! Link prediction with learned → heuristic fallback.
//!
//! | Method | Training | Can fail? |
//! |--------|----------|-----------|
//! | any [`HeuristicKind`] (`common_neighbors`, `jaccard`, ...) | none | only on `k == 0` |
//! | `learned` | per request, under a deadline | yes, recovered by fallback |
//!
//! When the learned scorer cannot be trained (too little data, timeout,
//! divergence), the configured fallback heuristic ranks the candidates
//! instead. The report says which scorer actually ran and why the fallback
//! happened, and the reason is also returned as a warning.
//!
//! Activity prediction follows the same contract: `learned` falls back to
//! `degree` centrality when training fails recoverably.

use serde::{Deserialize, Serialize};
use socnet_core::algo::activity::{self, ActivityPrediction};
use socnet_core::algo::link::{predict_links, HeuristicKind, LinkPrediction};
use socnet_core::Graph;
use socnet_nn::{predict_activity_learned, predict_learned, TrainingConfig};
use std::fmt;
use std::str::FromStr;

/// How candidate links are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LinkMethod {
    /// A training-free heuristic.
    Heuristic(HeuristicKind),
    /// The per-request learned scorer.
    Learned,
}

impl Default for LinkMethod {
    fn default() -> Self {
        LinkMethod::Heuristic(HeuristicKind::CommonNeighbors)
    }
}

impl fmt::Display for LinkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkMethod::Heuristic(h) => fmt::Display::fmt(h, f),
            LinkMethod::Learned => f.write_str("learned"),
        }
    }
}

impl FromStr for LinkMethod {
    type Err = socnet_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("learned") {
            Ok(LinkMethod::Learned)
        } else {
            s.parse().map(LinkMethod::Heuristic)
        }
    }
}

impl TryFrom<String> for LinkMethod {
    type Error = socnet_core::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LinkMethod> for String {
    fn from(m: LinkMethod) -> Self {
        m.to_string()
    }
}

/// Ranked links plus how they were produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    /// Method that was asked for.
    pub requested: LinkMethod,
    /// Scorer that produced `predictions`.
    pub scorer: String,
    /// Why the requested method was replaced, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Top candidates, best first.
    pub predictions: Vec<LinkPrediction>,
}

impl LinkReport {
    /// Whether the fallback heuristic ran instead of the requested method.
    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Rank the top `k` links with `method`, falling back to `fallback` when
/// the learned scorer fails recoverably.
///
/// Parameter errors (`k == 0`, invalid training config) are returned, never
/// papered over by the fallback.
pub fn predict(
    graph: &Graph,
    method: LinkMethod,
    fallback: HeuristicKind,
    training: &TrainingConfig,
    k: usize,
) -> socnet_core::Result<LinkReport> {
    let heuristic_report = |heuristic: HeuristicKind, reason: Option<String>| {
        socnet_core::Result::Ok(LinkReport {
            requested: method,
            scorer: heuristic.to_string(),
            fallback: reason,
            predictions: predict_links(graph, heuristic, k)?,
        })
    };

    match method {
        LinkMethod::Heuristic(h) => heuristic_report(h, None),
        LinkMethod::Learned => match predict_learned(graph, training, k) {
            Ok(predictions) => Ok(LinkReport {
                requested: method,
                scorer: "learned".to_string(),
                fallback: None,
                predictions,
            }),
            Err(socnet_nn::Error::Core(e)) => Err(e),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = %fallback,
                    "learned link scorer unavailable, falling back"
                );
                heuristic_report(fallback, Some(e.to_string()))
            }
        },
    }
}

/// How member activity is predicted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActivityMethod {
    /// Degree centrality.
    #[default]
    Degree,
    /// The per-request learned regression.
    Learned,
}

impl fmt::Display for ActivityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivityMethod::Degree => "degree",
            ActivityMethod::Learned => "learned",
        })
    }
}

impl FromStr for ActivityMethod {
    type Err = socnet_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degree" => Ok(ActivityMethod::Degree),
            "learned" => Ok(ActivityMethod::Learned),
            _ => Err(socnet_core::Error::UnknownAlgorithm {
                family: "activity",
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ActivityMethod {
    type Error = socnet_core::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ActivityMethod> for String {
    fn from(m: ActivityMethod) -> Self {
        m.to_string()
    }
}

/// Ranked members plus how they were scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    /// Method that was asked for.
    pub requested: ActivityMethod,
    /// Scorer that produced `predictions`.
    pub scorer: String,
    /// Why the requested method was replaced, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Most active members first.
    pub predictions: Vec<ActivityPrediction>,
}

impl ActivityReport {
    /// Whether degree centrality ran instead of the requested method.
    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Rank the `k` most active members with `method`, falling back to degree
/// centrality when the learned model fails recoverably.
pub fn predict_activity(
    graph: &Graph,
    method: ActivityMethod,
    training: &TrainingConfig,
    k: usize,
) -> socnet_core::Result<ActivityReport> {
    let degree_report = |reason: Option<String>| {
        socnet_core::Result::Ok(ActivityReport {
            requested: method,
            scorer: ActivityMethod::Degree.to_string(),
            fallback: reason,
            predictions: activity::predict_activity(graph, k)?,
        })
    };

    match method {
        ActivityMethod::Degree => degree_report(None),
        ActivityMethod::Learned => match predict_activity_learned(graph, training, k) {
            Ok(predictions) => Ok(ActivityReport {
                requested: method,
                scorer: "learned".to_string(),
                fallback: None,
                predictions,
            }),
            Err(socnet_nn::Error::Core(e)) => Err(e),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "learned activity model unavailable, falling back to degree"
                );
                degree_report(Some(e.to_string()))
            }
        },
    }
}
