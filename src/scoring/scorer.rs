use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::config::{Config, HalfLives, ScoreThresholds, ScoreWeights};
use crate::item::metadata::{KEY_CITATIONS, KEY_STARS};
use crate::item::{MetadataExt, SynthesizedItem};

use super::factors;
use super::types::{QualityLevel, QualityScore, ScoredItem};

const BASE_CONFIDENCE: f64 = 0.5;
const SIGNAL_CONFIDENCE: f64 = 0.1;
const SYNTHESIS_CONFIDENCE: f64 = 0.2;

/// Stateless multi-factor scorer.
///
/// Holds only its injected configuration, so a single instance can be shared freely across
/// tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    weights: ScoreWeights,
    half_lives: HalfLives,
    thresholds: ScoreThresholds,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(
            ScoreWeights::default(),
            HalfLives::default(),
            ScoreThresholds::default(),
        )
    }
}

impl Scorer {
    pub fn new(weights: ScoreWeights, half_lives: HalfLives, thresholds: ScoreThresholds) -> Self {
        Self {
            weights,
            half_lives,
            thresholds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.weights, config.half_lives, config.thresholds)
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn half_lives(&self) -> &HalfLives {
        &self.half_lives
    }

    pub fn thresholds(&self) -> &ScoreThresholds {
        &self.thresholds
    }

    /// Scores a single item against `query` as of `now`.
    pub fn score_one(&self, item: SynthesizedItem, query: &str, now: DateTime<Utc>) -> ScoredItem {
        let engagement = factors::engagement(&item);
        let citations = factors::citations(&item);
        let (recency, has_timestamp) = factors::recency(&item, now, &self.half_lives);
        let query_match = factors::query_match(&item, query);
        let synthesis = factors::synthesis(&item);

        let weighted = engagement * self.weights.engagement
            + citations * self.weights.citations
            + recency * self.weights.recency
            + query_match * self.weights.query_match
            + synthesis * self.weights.synthesis;
        let value = if weighted.is_finite() {
            weighted.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let meta = item.metadata();
        let mut confidence = BASE_CONFIDENCE;
        if meta.get_f64(KEY_STARS).is_some() {
            confidence += SIGNAL_CONFIDENCE;
        }
        if meta.get_f64(KEY_CITATIONS).is_some() {
            confidence += SIGNAL_CONFIDENCE;
        }
        if has_timestamp {
            confidence += SIGNAL_CONFIDENCE;
        }
        if item.synthesis.confidence > 0.0 {
            confidence += SYNTHESIS_CONFIDENCE;
        }

        let factors = BTreeMap::from([
            ("engagement".to_string(), engagement),
            ("citations".to_string(), citations),
            ("recency".to_string(), recency),
            ("query_match".to_string(), query_match),
            ("synthesis".to_string(), synthesis),
        ]);

        let score = QualityScore {
            value,
            level: QualityLevel::classify(value, &self.thresholds),
            factors,
            confidence: confidence.min(1.0),
            scored_at: now,
        };
        ScoredItem::new(item, score)
    }

    /// Scores every item, preserving input order.
    #[instrument(skip(self, items, query), fields(items = items.len(), query_len = query.len()))]
    pub fn score_batch(
        &self,
        items: Vec<SynthesizedItem>,
        query: &str,
        now: DateTime<Utc>,
    ) -> Vec<ScoredItem> {
        let scored: Vec<ScoredItem> = items
            .into_iter()
            .map(|item| self.score_one(item, query, now))
            .collect();

        debug!(
            high = scored
                .iter()
                .filter(|s| s.score.level == QualityLevel::High)
                .count(),
            "Scored batch"
        );
        scored
    }
}
