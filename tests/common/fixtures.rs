//! Test fixtures for integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use crosshunt::{ItemKind, ItemSource, RateLimiter, RawItem, Synthesis, SynthesizedItem};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> String {
    (fixed_now() - TimeDelta::days(days)).to_rfc3339()
}

pub struct ItemBuilder {
    raw: RawItem,
    synthesis: Option<Synthesis>,
}

impl ItemBuilder {
    pub fn new(id: &str, kind: ItemKind, title: &str) -> Self {
        Self {
            raw: RawItem::new(id, kind, title).with_url(format!("https://example.test/{id}")),
            synthesis: None,
        }
    }

    pub fn repo(id: &str, title: &str) -> Self {
        Self::new(id, ItemKind::Repository, title)
    }

    pub fn paper(id: &str, title: &str) -> Self {
        Self::new(id, ItemKind::Paper, title)
    }

    pub fn discussion(id: &str, title: &str) -> Self {
        Self::new(id, ItemKind::Discussion, title)
    }

    pub fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.raw = self.raw.with_meta(key, value);
        self
    }

    pub fn stars(self, stars: i64) -> Self {
        self.meta("stars", stars)
    }

    pub fn updated_days_ago(self, days: i64) -> Self {
        self.meta("updated_at", days_ago(days))
    }

    pub fn topics(self, topics: &[&str]) -> Self {
        self.meta("topics", json!(topics))
    }

    pub fn source(self, source: &str) -> Self {
        self.meta("source", source)
    }

    pub fn synthesis(mut self, summary: &str, key_features: &[&str], confidence: f64) -> Self {
        self.synthesis = Some(Synthesis {
            summary: summary.to_string(),
            key_features: key_features.iter().map(|f| f.to_string()).collect(),
            confidence,
            ..Synthesis::default()
        });
        self
    }

    pub fn build(self) -> SynthesizedItem {
        let item = SynthesizedItem::from(self.raw);
        match self.synthesis {
            Some(synthesis) => item.with_synthesis(synthesis),
            None => item,
        }
    }
}

/// Hunter serving canned items per query, optionally behind a rate limiter.
pub struct FixtureSource {
    name: String,
    by_query: HashMap<String, Vec<SynthesizedItem>>,
    limiter: Option<Arc<RateLimiter>>,
    calls: AtomicUsize,
}

impl FixtureSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            by_query: HashMap::new(),
            limiter: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_items(mut self, query: &str, items: Vec<SynthesizedItem>) -> Self {
        self.by_query.insert(query.to_string(), items);
        self
    }

    pub fn rate_limited(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSource for FixtureSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(
        &self,
        query: &str,
        _targets: &[String],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<SynthesizedItem>> {
        if let Some(limiter) = &self.limiter {
            limiter.wait(cancel).await?;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_query.get(query).cloned().unwrap_or_default())
    }
}
