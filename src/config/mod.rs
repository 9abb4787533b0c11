//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CROSSHUNT_*` environment variables, or build
//! the structs directly when embedding the crate.

pub mod error;
pub mod sections;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use sections::{CorrelationConfig, HalfLives, ModeTtls, ScoreThresholds, ScoreWeights};

use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_JOB_TTL_SECS, DEFAULT_MAX_JOBS};

/// Top-level configuration for the scoring engines, cache, and job store.
///
/// Use [`Config::from_env`] to read `CROSSHUNT_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Factor weights for the final quality score.
    pub weights: ScoreWeights,

    /// Recency half-lives (days).
    pub half_lives: HalfLives,

    /// Level thresholds applied by the scorer. Default: `0.7 / 0.4`.
    pub thresholds: ScoreThresholds,

    /// Cross-source correlation settings.
    pub correlation: CorrelationConfig,

    /// Max entries in the scan result cache. Default: `256`.
    pub cache_capacity: usize,

    /// Retention window for jobs (queued expiry and terminal retention). Default: 1 hour.
    pub job_ttl: Duration,

    /// Max jobs retained after a pruning pass. Default: `512`.
    pub max_jobs: usize,

    /// Cache TTL per scan mode.
    pub mode_ttls: ModeTtls,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            half_lives: HalfLives::default(),
            thresholds: ScoreThresholds::default(),
            correlation: CorrelationConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            job_ttl: Duration::from_secs(DEFAULT_JOB_TTL_SECS),
            max_jobs: DEFAULT_MAX_JOBS,
            mode_ttls: ModeTtls::default(),
        }
    }
}

impl Config {
    const ENV_WEIGHT_ENGAGEMENT: &'static str = "CROSSHUNT_WEIGHT_ENGAGEMENT";
    const ENV_WEIGHT_CITATIONS: &'static str = "CROSSHUNT_WEIGHT_CITATIONS";
    const ENV_WEIGHT_RECENCY: &'static str = "CROSSHUNT_WEIGHT_RECENCY";
    const ENV_WEIGHT_QUERY_MATCH: &'static str = "CROSSHUNT_WEIGHT_QUERY_MATCH";
    const ENV_WEIGHT_SYNTHESIS: &'static str = "CROSSHUNT_WEIGHT_SYNTHESIS";
    const ENV_HALF_LIFE_TRENDS: &'static str = "CROSSHUNT_HALF_LIFE_TRENDS_DAYS";
    const ENV_HALF_LIFE_RESEARCH: &'static str = "CROSSHUNT_HALF_LIFE_RESEARCH_DAYS";
    const ENV_HALF_LIFE_REPOS: &'static str = "CROSSHUNT_HALF_LIFE_REPOS_DAYS";
    const ENV_THRESHOLD_HIGH: &'static str = "CROSSHUNT_THRESHOLD_HIGH";
    const ENV_THRESHOLD_MEDIUM: &'static str = "CROSSHUNT_THRESHOLD_MEDIUM";
    const ENV_CORRELATION_MIN_SOURCES: &'static str = "CROSSHUNT_CORRELATION_MIN_SOURCES";
    const ENV_CORRELATION_BOOST_STEP: &'static str = "CROSSHUNT_CORRELATION_BOOST_STEP";
    const ENV_CORRELATION_HIGH: &'static str = "CROSSHUNT_CORRELATION_HIGH";
    const ENV_CORRELATION_MEDIUM: &'static str = "CROSSHUNT_CORRELATION_MEDIUM";
    const ENV_CACHE_CAPACITY: &'static str = "CROSSHUNT_CACHE_CAPACITY";
    const ENV_JOB_TTL_SECS: &'static str = "CROSSHUNT_JOB_TTL_SECS";
    const ENV_MAX_JOBS: &'static str = "CROSSHUNT_MAX_JOBS";
    const ENV_TTL_QUICK_SECS: &'static str = "CROSSHUNT_TTL_QUICK_SECS";
    const ENV_TTL_STANDARD_SECS: &'static str = "CROSSHUNT_TTL_STANDARD_SECS";
    const ENV_TTL_DEEP_SECS: &'static str = "CROSSHUNT_TTL_DEEP_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Floating-point settings that fail to parse are an error; integer settings that fail to
    /// parse keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let weights = ScoreWeights {
            engagement: Self::parse_f64_from_env(
                Self::ENV_WEIGHT_ENGAGEMENT,
                defaults.weights.engagement,
            )?,
            citations: Self::parse_f64_from_env(
                Self::ENV_WEIGHT_CITATIONS,
                defaults.weights.citations,
            )?,
            recency: Self::parse_f64_from_env(Self::ENV_WEIGHT_RECENCY, defaults.weights.recency)?,
            query_match: Self::parse_f64_from_env(
                Self::ENV_WEIGHT_QUERY_MATCH,
                defaults.weights.query_match,
            )?,
            synthesis: Self::parse_f64_from_env(
                Self::ENV_WEIGHT_SYNTHESIS,
                defaults.weights.synthesis,
            )?,
        };

        let half_lives = HalfLives {
            trends: Self::parse_f64_from_env(
                Self::ENV_HALF_LIFE_TRENDS,
                defaults.half_lives.trends,
            )?,
            research: Self::parse_f64_from_env(
                Self::ENV_HALF_LIFE_RESEARCH,
                defaults.half_lives.research,
            )?,
            repos: Self::parse_f64_from_env(Self::ENV_HALF_LIFE_REPOS, defaults.half_lives.repos)?,
        };

        let thresholds = ScoreThresholds {
            high: Self::parse_f64_from_env(Self::ENV_THRESHOLD_HIGH, defaults.thresholds.high)?,
            medium: Self::parse_f64_from_env(
                Self::ENV_THRESHOLD_MEDIUM,
                defaults.thresholds.medium,
            )?,
        };

        let correlation = CorrelationConfig {
            min_sources: Self::parse_usize_from_env(
                Self::ENV_CORRELATION_MIN_SOURCES,
                defaults.correlation.min_sources,
            ),
            boost_step: Self::parse_f64_from_env(
                Self::ENV_CORRELATION_BOOST_STEP,
                defaults.correlation.boost_step,
            )?,
            thresholds: ScoreThresholds {
                high: Self::parse_f64_from_env(
                    Self::ENV_CORRELATION_HIGH,
                    defaults.correlation.thresholds.high,
                )?,
                medium: Self::parse_f64_from_env(
                    Self::ENV_CORRELATION_MEDIUM,
                    defaults.correlation.thresholds.medium,
                )?,
            },
        };

        let mode_ttls = ModeTtls {
            quick: Self::parse_secs_from_env(Self::ENV_TTL_QUICK_SECS, defaults.mode_ttls.quick),
            standard: Self::parse_secs_from_env(
                Self::ENV_TTL_STANDARD_SECS,
                defaults.mode_ttls.standard,
            ),
            deep: Self::parse_secs_from_env(Self::ENV_TTL_DEEP_SECS, defaults.mode_ttls.deep),
        };

        Ok(Self {
            weights,
            half_lives,
            thresholds,
            correlation,
            cache_capacity: Self::parse_usize_from_env(
                Self::ENV_CACHE_CAPACITY,
                defaults.cache_capacity,
            ),
            job_ttl: Self::parse_secs_from_env(Self::ENV_JOB_TTL_SECS, defaults.job_ttl),
            max_jobs: Self::parse_usize_from_env(Self::ENV_MAX_JOBS, defaults.max_jobs),
            mode_ttls,
        })
    }

    /// Validates ranges and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.weights.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        for (name, value) in [
            ("trends", self.half_lives.trends),
            ("research", self.half_lives.research),
            ("repos", self.half_lives.repos),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidHalfLife { name, value });
            }
        }

        Self::validate_thresholds("score", &self.thresholds)?;
        Self::validate_thresholds("correlation", &self.correlation.thresholds)?;

        if self.correlation.min_sources == 0 {
            return Err(ConfigError::InvalidValue {
                name: "correlation.min_sources",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.correlation.boost_step.is_finite() || self.correlation.boost_step < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "correlation.boost_step",
                reason: format!("{} is not a finite value >= 0", self.correlation.boost_step),
            });
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                name: "cache_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_jobs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_jobs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    fn validate_thresholds(
        scheme: &'static str,
        thresholds: &ScoreThresholds,
    ) -> Result<(), ConfigError> {
        let ScoreThresholds { high, medium } = *thresholds;
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(high) || !in_range(medium) || medium > high {
            return Err(ConfigError::InvalidThresholds {
                scheme,
                high,
                medium,
            });
        }
        Ok(())
    }

    fn parse_f64_from_env(name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse::<f64>()
                .map_err(|e| ConfigError::ParseError {
                    name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(name: &str, default: usize) -> usize {
        env::var(name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_secs_from_env(name: &str, default: Duration) -> Duration {
        env::var(name)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(default)
    }
}
