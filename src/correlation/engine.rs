use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, instrument};

use crate::config::CorrelationConfig;
use crate::constants::CROSS_HUNTER_BOOST_FACTOR;
use crate::scoring::{QualityLevel, ScoredItem};

use super::topics::{extract_topics, source_of};
use super::types::CorrelatedTopic;

/// Boosts items whose topics are corroborated by several independent sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationEngine {
    config: CorrelationConfig,
}

impl CorrelationEngine {
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Boost for a topic seen from `distinct_sources` sources.
    pub fn boost_for(&self, distinct_sources: usize) -> f64 {
        1.0 + self.config.boost_step * distinct_sources.saturating_sub(1) as f64
    }

    /// Applies cross-source boosts and returns the corroborated topics.
    ///
    /// Each boosted item takes the largest boost among its qualifying topics; boosts from
    /// several topics never compound.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub fn correlate_and_boost(
        &self,
        mut items: Vec<ScoredItem>,
    ) -> (Vec<ScoredItem>, Vec<CorrelatedTopic>) {
        // topic -> source -> item indices
        let mut index: HashMap<String, BTreeMap<String, Vec<usize>>> = HashMap::new();
        for (idx, item) in items.iter().enumerate() {
            let source = source_of(&item.synthesized);
            for topic in extract_topics(&item.synthesized) {
                index
                    .entry(topic)
                    .or_default()
                    .entry(source.clone())
                    .or_default()
                    .push(idx);
            }
        }

        let mut item_boosts: HashMap<usize, f64> = HashMap::new();
        let mut topics = Vec::new();
        for (topic, by_source) in index {
            if by_source.len() < self.config.min_sources {
                continue;
            }
            let boost = self.boost_for(by_source.len());
            let members: BTreeSet<usize> = by_source.values().flatten().copied().collect();
            for &idx in &members {
                let current = item_boosts.entry(idx).or_insert(boost);
                if boost > *current {
                    *current = boost;
                }
            }
            topics.push(CorrelatedTopic {
                topic,
                sources: by_source.into_keys().collect(),
                boost_factor: boost,
                item_count: members.len(),
            });
        }

        for (idx, boost) in &item_boosts {
            let score = &mut items[*idx].score;
            score.value = (score.value * boost).min(1.0);
            score.level = QualityLevel::classify(score.value, &self.config.thresholds);
            score
                .factors
                .insert(CROSS_HUNTER_BOOST_FACTOR.to_string(), *boost);
        }

        topics.sort_by(|a, b| {
            b.sources
                .len()
                .cmp(&a.sources.len())
                .then_with(|| a.topic.cmp(&b.topic))
        });

        debug!(
            topics = topics.len(),
            boosted_items = item_boosts.len(),
            "Cross-source correlation complete"
        );
        (items, topics)
    }
}
