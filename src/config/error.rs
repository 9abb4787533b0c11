//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {reason}")]
    ParseError {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A score weight is negative or not finite.
    #[error("invalid weight '{name}': {value} (must be finite and >= 0)")]
    InvalidWeight { name: &'static str, value: f64 },

    /// A threshold pair is out of range or inverted.
    #[error("invalid {scheme} thresholds: high={high}, medium={medium}")]
    InvalidThresholds {
        scheme: &'static str,
        high: f64,
        medium: f64,
    },

    /// A recency half-life is not strictly positive.
    #[error("invalid half-life '{name}': {value} days (must be > 0)")]
    InvalidHalfLife { name: &'static str, value: f64 },

    /// A size or count setting is zero or otherwise unusable.
    #[error("invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
