//! Typed reads over the free-form metadata bag.
//!
//! Collaborators are inconsistent about encodings (numbers as strings, timestamps as RFC3339
//! or Unix seconds), so every accessor is lenient and returns `None` rather than failing.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// String-keyed, dynamically typed metadata.
pub type Metadata = serde_json::Map<String, Value>;

pub const KEY_STARS: &str = "stars";
pub const KEY_POINTS: &str = "points";
pub const KEY_COMMENTS: &str = "comments";
pub const KEY_CITATIONS: &str = "citations";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_SOURCE: &str = "source";
pub const KEY_TOPICS: &str = "topics";
pub const KEY_TAGS: &str = "tags";

/// Timestamp keys, highest priority first.
pub const TIMESTAMP_KEYS: [&str; 3] = ["updated_at", "created_at", "published_at"];

pub trait MetadataExt {
    /// Reads a number stored as a JSON number or a numeric string.
    fn get_f64(&self, key: &str) -> Option<f64>;

    /// Reads a non-empty string.
    fn get_str(&self, key: &str) -> Option<&str>;

    /// Reads a list of strings, skipping non-string elements.
    fn get_strings(&self, key: &str) -> Vec<String>;

    /// Reads a timestamp stored as RFC3339 text or integer Unix seconds.
    fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>>;

    /// First timestamp found among [`TIMESTAMP_KEYS`].
    fn best_timestamp(&self) -> Option<DateTime<Utc>> {
        TIMESTAMP_KEYS.iter().find_map(|key| self.get_timestamp(key))
    }
}

impl MetadataExt for Metadata {
    fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn get_strings(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key)? {
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            _ => None,
        }
    }
}
