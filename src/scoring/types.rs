use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScoreThresholds;
use crate::item::SynthesizedItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Coarse quality bucket.
pub enum QualityLevel {
    High,
    Medium,
    Low,
}

impl QualityLevel {
    /// Classifies `value` against a threshold pair.
    pub fn classify(value: f64, thresholds: &ScoreThresholds) -> Self {
        if value >= thresholds.high {
            Self::High
        } else if value >= thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Multi-factor quality score for one item.
pub struct QualityScore {
    /// Weighted score in `[0, 1]`.
    pub value: f64,
    pub level: QualityLevel,
    /// Per-factor values in `[0, 1]`, plus any boost recorded by correlation.
    pub factors: BTreeMap<String, f64>,
    /// Evidence completeness in `[0, 1]`; independent of `value`.
    pub confidence: f64,
    pub scored_at: DateTime<Utc>,
}

impl QualityScore {
    /// Returns a factor by name.
    pub fn factor(&self, name: &str) -> Option<f64> {
        self.factors.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// An item paired with its score.
pub struct ScoredItem {
    pub synthesized: SynthesizedItem,
    pub score: QualityScore,
}

impl ScoredItem {
    pub fn new(synthesized: SynthesizedItem, score: QualityScore) -> Self {
        Self { synthesized, score }
    }

    pub fn id(&self) -> &str {
        self.synthesized.id()
    }
}
