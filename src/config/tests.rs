use super::*;
use serial_test::serial;
use std::env;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_crosshunt_env() {
    let names: Vec<String> = env::vars()
        .map(|(k, _)| k)
        .filter(|k| k.starts_with("CROSSHUNT_"))
        .collect();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for name in names {
        unsafe { env::remove_var(name) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.weights.engagement, 0.35);
    assert_eq!(config.half_lives.repos, 180.0);
    assert_eq!(config.thresholds.high, 0.7);
    assert_eq!(config.thresholds.medium, 0.4);
    assert_eq!(config.correlation.min_sources, 2);
    assert_eq!(config.correlation.boost_step, 0.25);
    assert_eq!(config.correlation.thresholds, config.thresholds);
    assert_eq!(config.cache_capacity, 256);
    assert_eq!(config.job_ttl, Duration::from_secs(3600));
    assert!(config.mode_ttls.quick < config.mode_ttls.standard);
    assert!(config.mode_ttls.standard < config.mode_ttls.deep);
}

#[test]
fn test_default_weights_sum_to_one() {
    let sum: f64 = ScoreWeights::default().named().iter().map(|(_, w)| w).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_crosshunt_env();

    let config = Config::from_env().expect("should parse with defaults");
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_custom_weights_and_thresholds() {
    clear_crosshunt_env();

    with_env_vars(
        &[
            ("CROSSHUNT_WEIGHT_ENGAGEMENT", "0.5"),
            ("CROSSHUNT_WEIGHT_SYNTHESIS", " 0.0 "),
            ("CROSSHUNT_THRESHOLD_HIGH", "0.8"),
            ("CROSSHUNT_CORRELATION_HIGH", "0.9"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.weights.engagement, 0.5);
            assert_eq!(config.weights.synthesis, 0.0);
            assert_eq!(config.thresholds.high, 0.8);
            assert_eq!(config.correlation.thresholds.high, 0.9);
            assert_eq!(config.correlation.thresholds.medium, 0.4);
        },
    );
}

#[test]
#[serial]
fn test_from_env_custom_durations_and_sizes() {
    clear_crosshunt_env();

    with_env_vars(
        &[
            ("CROSSHUNT_TTL_QUICK_SECS", "10"),
            ("CROSSHUNT_JOB_TTL_SECS", "120"),
            ("CROSSHUNT_CACHE_CAPACITY", "8"),
            ("CROSSHUNT_MAX_JOBS", "3"),
            ("CROSSHUNT_CORRELATION_MIN_SOURCES", "3"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.mode_ttls.quick, Duration::from_secs(10));
            assert_eq!(config.job_ttl, Duration::from_secs(120));
            assert_eq!(config.cache_capacity, 8);
            assert_eq!(config.max_jobs, 3);
            assert_eq!(config.correlation.min_sources, 3);
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_weight_is_error() {
    clear_crosshunt_env();

    with_env_vars(&[("CROSSHUNT_WEIGHT_RECENCY", "lots")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ParseError {
                name: "CROSSHUNT_WEIGHT_RECENCY",
                ..
            }
        ));
        assert!(err.to_string().contains("lots"));
    });
}

#[test]
#[serial]
fn test_from_env_invalid_capacity_uses_default() {
    clear_crosshunt_env();

    with_env_vars(&[("CROSSHUNT_CACHE_CAPACITY", "not_a_number")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.cache_capacity, 256);
    });
}

#[test]
fn test_validate_success_with_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_negative_weight() {
    let config = Config {
        weights: ScoreWeights {
            citations: -0.1,
            ..Default::default()
        },
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidWeight {
            name: "citations",
            ..
        }
    ));
}

#[test]
fn test_validate_accepts_weights_not_summing_to_one() {
    let config = Config {
        weights: ScoreWeights {
            engagement: 2.0,
            citations: 2.0,
            recency: 2.0,
            query_match: 2.0,
            synthesis: 2.0,
        },
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_inverted_thresholds() {
    let config = Config {
        thresholds: ScoreThresholds {
            high: 0.3,
            medium: 0.6,
        },
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("score thresholds"));

    let config = Config {
        correlation: CorrelationConfig {
            thresholds: ScoreThresholds {
                high: 1.5,
                medium: 0.4,
            },
            ..Default::default()
        },
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("correlation thresholds"));
}

#[test]
fn test_validate_rejects_zero_half_life() {
    let config = Config {
        half_lives: HalfLives {
            research: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidHalfLife {
            name: "research",
            ..
        }
    ));
}

#[test]
fn test_validate_rejects_zero_sizes() {
    let config = Config {
        cache_capacity: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidValue {
            name: "cache_capacity",
            ..
        }
    ));

    let config = Config {
        correlation: CorrelationConfig {
            min_sources: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
