//! Individual scoring factors. Each returns a value in `[0, 1]`.

use chrono::{DateTime, Utc};

use crate::config::HalfLives;
use crate::constants::{ENGAGEMENT_FLOOR, NEUTRAL_FACTOR, SECONDS_PER_DAY};
use crate::item::metadata::{
    KEY_CITATIONS, KEY_COMMENTS, KEY_DESCRIPTION, KEY_POINTS, KEY_STARS, KEY_TAGS, KEY_TOPICS,
};
use crate::item::{ItemKind, MetadataExt, SynthesizedItem};

const TITLE_WEIGHT: f64 = 0.5;
const DESCRIPTION_WEIGHT: f64 = 0.3;
const TOPIC_WEIGHT: f64 = 0.2;

/// Exponential decay `0.5^(age / half_life)`.
///
/// Returns `1.0` for zero or negative age (future timestamps count as "now").
pub fn temporal_decay(age_days: f64, half_life_days: f64) -> f64 {
    if age_days <= 0.0 {
        return 1.0;
    }
    if half_life_days <= 0.0 || !half_life_days.is_finite() {
        return 0.0;
    }
    0.5_f64.powf(age_days / half_life_days).clamp(0.0, 1.0)
}

/// Half-life (days) used for an item kind.
pub fn half_life_for(kind: ItemKind, half_lives: &HalfLives) -> f64 {
    match kind {
        ItemKind::Discussion => half_lives.trends,
        ItemKind::Paper => half_lives.research,
        ItemKind::Repository | ItemKind::Unknown => half_lives.repos,
    }
}

fn log_scale(base: f64, metric: f64, floor: f64) -> f64 {
    if metric <= 0.0 {
        return floor;
    }
    (base + 0.2 * metric.log10()).clamp(floor, 1.0)
}

/// Type-specific popularity on a log scale.
pub fn engagement(item: &SynthesizedItem) -> f64 {
    let meta = item.metadata();
    match item.kind() {
        ItemKind::Repository => {
            let stars = meta.get_f64(KEY_STARS).unwrap_or(0.0);
            log_scale(ENGAGEMENT_FLOOR, stars, ENGAGEMENT_FLOOR)
        }
        ItemKind::Discussion => {
            let points = meta.get_f64(KEY_POINTS).unwrap_or(0.0);
            let comments = meta.get_f64(KEY_COMMENTS).unwrap_or(0.0);
            log_scale(ENGAGEMENT_FLOOR, points + 0.5 * comments, ENGAGEMENT_FLOOR)
        }
        // Papers are judged by citations instead.
        ItemKind::Paper | ItemKind::Unknown => NEUTRAL_FACTOR,
    }
}

/// Citation count on a log scale; neutral when absent or zero.
pub fn citations(item: &SynthesizedItem) -> f64 {
    match item.metadata().get_f64(KEY_CITATIONS) {
        Some(count) if count > 0.0 => log_scale(0.3, count, 0.0),
        _ => NEUTRAL_FACTOR,
    }
}

/// Decay from the best available timestamp. Returns the factor and whether a timestamp was found.
pub fn recency(item: &SynthesizedItem, now: DateTime<Utc>, half_lives: &HalfLives) -> (f64, bool) {
    let Some(timestamp) = item.metadata().best_timestamp() else {
        return (NEUTRAL_FACTOR, false);
    };
    let age_days = (now - timestamp).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
    let half_life = half_life_for(item.kind(), half_lives);
    (temporal_decay(age_days, half_life), true)
}

/// Weighted substring matching of query terms against title, description, and topics.
pub fn query_match(item: &SynthesizedItem, query: &str) -> f64 {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if terms.is_empty() {
        return NEUTRAL_FACTOR;
    }

    let per_term = 1.0 / terms.len() as f64;
    let meta = item.metadata();
    let title = item.title().to_lowercase();
    let description = meta
        .get_str(KEY_DESCRIPTION)
        .map(str::to_lowercase)
        .unwrap_or_default();
    let topics: Vec<String> = meta
        .get_strings(KEY_TOPICS)
        .into_iter()
        .chain(meta.get_strings(KEY_TAGS))
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut score = 0.0;
    for term in &terms {
        if title.contains(term.as_str()) {
            score += TITLE_WEIGHT * per_term;
        }
        if !description.is_empty() && description.contains(term.as_str()) {
            score += DESCRIPTION_WEIGHT * per_term;
        }
        if topics
            .iter()
            .any(|topic| topic.contains(term.as_str()) || term.contains(topic.as_str()))
        {
            score += TOPIC_WEIGHT * per_term;
        }
    }
    score.clamp(0.0, 1.0)
}

/// The synthesis step's self-reported confidence, or neutral when not synthesized.
pub fn synthesis(item: &SynthesizedItem) -> f64 {
    if item.synthesis.is_present() {
        let confidence = item.synthesis.confidence;
        if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        }
    } else {
        NEUTRAL_FACTOR
    }
}
