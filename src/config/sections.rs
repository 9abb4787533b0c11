use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BOOST_STEP, DEFAULT_HALF_LIFE_REPOS_DAYS, DEFAULT_HALF_LIFE_RESEARCH_DAYS,
    DEFAULT_HALF_LIFE_TRENDS_DAYS, DEFAULT_MIN_CORRELATION_SOURCES, DEFAULT_THRESHOLD_HIGH,
    DEFAULT_THRESHOLD_MEDIUM, DEFAULT_TTL_DEEP_SECS, DEFAULT_TTL_QUICK_SECS,
    DEFAULT_TTL_STANDARD_SECS, DEFAULT_WEIGHT_CITATIONS, DEFAULT_WEIGHT_ENGAGEMENT,
    DEFAULT_WEIGHT_QUERY_MATCH, DEFAULT_WEIGHT_RECENCY, DEFAULT_WEIGHT_SYNTHESIS,
};

/// Per-factor weights for the final score.
///
/// The weights need not sum to 1; the weighted sum is clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub engagement: f64,
    pub citations: f64,
    pub recency: f64,
    pub query_match: f64,
    pub synthesis: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            engagement: DEFAULT_WEIGHT_ENGAGEMENT,
            citations: DEFAULT_WEIGHT_CITATIONS,
            recency: DEFAULT_WEIGHT_RECENCY,
            query_match: DEFAULT_WEIGHT_QUERY_MATCH,
            synthesis: DEFAULT_WEIGHT_SYNTHESIS,
        }
    }
}

impl ScoreWeights {
    pub(crate) fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("engagement", self.engagement),
            ("citations", self.citations),
            ("recency", self.recency),
            ("query_match", self.query_match),
            ("synthesis", self.synthesis),
        ]
    }
}

/// Recency half-lives in days, per content family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfLives {
    /// Fast-moving discussion content.
    pub trends: f64,
    /// Academic papers.
    pub research: f64,
    /// Repositories, and the fallback for unknown kinds.
    pub repos: f64,
}

impl Default for HalfLives {
    fn default() -> Self {
        Self {
            trends: DEFAULT_HALF_LIFE_TRENDS_DAYS,
            research: DEFAULT_HALF_LIFE_RESEARCH_DAYS,
            repos: DEFAULT_HALF_LIFE_REPOS_DAYS,
        }
    }
}

/// Lower bounds for the `high` and `medium` quality levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_THRESHOLD_HIGH,
            medium: DEFAULT_THRESHOLD_MEDIUM,
        }
    }
}

/// Cross-source correlation settings.
///
/// `thresholds` is deliberately separate from the scoring thresholds: the two schemes
/// share defaults but are configured independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Distinct sources needed before a topic boosts its items.
    pub min_sources: usize,
    /// Boost added for each source beyond the first.
    pub boost_step: f64,
    /// Level thresholds used when reclassifying boosted items.
    pub thresholds: ScoreThresholds,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_sources: DEFAULT_MIN_CORRELATION_SOURCES,
            boost_step: DEFAULT_BOOST_STEP,
            thresholds: ScoreThresholds::default(),
        }
    }
}

/// Cache TTLs per scan mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTtls {
    pub quick: Duration,
    pub standard: Duration,
    pub deep: Duration,
}

impl Default for ModeTtls {
    fn default() -> Self {
        Self {
            quick: Duration::from_secs(DEFAULT_TTL_QUICK_SECS),
            standard: Duration::from_secs(DEFAULT_TTL_STANDARD_SECS),
            deep: Duration::from_secs(DEFAULT_TTL_DEEP_SECS),
        }
    }
}
