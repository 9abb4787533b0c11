use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ModeTtls;
use crate::correlation::CorrelatedTopic;
use crate::hashing::hash_canonical_json;
use crate::scoring::ScoredItem;

/// Scan depth. Selects how long a finished report stays cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl ScanMode {
    pub fn ttl(&self, ttls: &ModeTtls) -> Duration {
        match self {
            Self::Quick => ttls.quick,
            Self::Standard => ttls.standard,
            Self::Deep => ttls.deep,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Standard => "standard",
            Self::Deep => "deep",
        }
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical scan: which hunters to ask, for which queries, scoped to which targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub hunters: Vec<String>,
    pub queries: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub mode: ScanMode,
}

#[derive(Serialize)]
struct CacheKeyView<'a> {
    hunters: Vec<&'a str>,
    queries: Vec<&'a str>,
    targets: &'a [String],
    mode: ScanMode,
}

impl ScanRequest {
    pub fn new<H, Q>(hunters: H, queries: Q) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
    {
        Self {
            hunters: hunters.into_iter().map(Into::into).collect(),
            queries: queries.into_iter().map(Into::into).collect(),
            targets: Vec::new(),
            mode: ScanMode::default(),
        }
    }

    pub fn with_targets<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Hunters sorted and deduplicated; the order in which sources are consulted.
    pub fn normalized_hunters(&self) -> Vec<&str> {
        let mut hunters: Vec<&str> = self.hunters.iter().map(String::as_str).collect();
        hunters.sort_unstable();
        hunters.dedup();
        hunters
    }

    /// Queries with surrounding whitespace trimmed; blank queries are dropped.
    pub fn effective_queries(&self) -> Vec<&str> {
        self.queries
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .collect()
    }

    /// Cache key for this request.
    ///
    /// Built from what the scan actually executes: the hunter set is order-insensitive and
    /// queries are the effective ones. Queries and targets keep their order, since query order
    /// decides which item wins deduplication.
    pub fn cache_key(&self) -> Result<String, serde_json::Error> {
        hash_canonical_json(&CacheKeyView {
            hunters: self.normalized_hunters(),
            queries: self.effective_queries(),
            targets: &self.targets,
            mode: self.mode,
        })
    }
}

/// One failed `(hunter, query)` collection inside an otherwise successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub hunter: String,
    pub query: String,
    pub error: String,
}

/// Result of a scan: scored items (best first) plus corroborated topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub items: Vec<ScoredItem>,
    pub topics: Vec<CorrelatedTopic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SourceFailure>,
    pub generated_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
