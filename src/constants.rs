//! Cross-cutting, shared constants.
//!
//! These are the defaults behind [`crate::config::Config`]. Engines never read them directly;
//! they receive the configured values at construction.

/// Neutral value for a factor with no evidence either way.
pub const NEUTRAL_FACTOR: f64 = 0.5;

/// Floor for engagement when the popularity metric is missing or non-positive.
pub const ENGAGEMENT_FLOOR: f64 = 0.1;

pub const DEFAULT_WEIGHT_ENGAGEMENT: f64 = 0.35;
pub const DEFAULT_WEIGHT_CITATIONS: f64 = 0.05;
pub const DEFAULT_WEIGHT_RECENCY: f64 = 0.30;
pub const DEFAULT_WEIGHT_QUERY_MATCH: f64 = 0.20;
pub const DEFAULT_WEIGHT_SYNTHESIS: f64 = 0.10;

pub const DEFAULT_HALF_LIFE_TRENDS_DAYS: f64 = 7.0;
pub const DEFAULT_HALF_LIFE_RESEARCH_DAYS: f64 = 365.0;
pub const DEFAULT_HALF_LIFE_REPOS_DAYS: f64 = 180.0;

pub const DEFAULT_THRESHOLD_HIGH: f64 = 0.7;
pub const DEFAULT_THRESHOLD_MEDIUM: f64 = 0.4;

/// Minimum distinct sources before a topic counts as corroborated.
pub const DEFAULT_MIN_CORRELATION_SOURCES: usize = 2;
/// Boost added per additional source beyond the first.
pub const DEFAULT_BOOST_STEP: f64 = 0.25;

/// Factor key recorded on boosted scores.
pub const CROSS_HUNTER_BOOST_FACTOR: &str = "cross_hunter_boost";

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

pub const DEFAULT_JOB_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_MAX_JOBS: usize = 512;

pub const DEFAULT_TTL_QUICK_SECS: u64 = 5 * 60;
pub const DEFAULT_TTL_STANDARD_SECS: u64 = 30 * 60;
pub const DEFAULT_TTL_DEEP_SECS: u64 = 2 * 60 * 60;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
