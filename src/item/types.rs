use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// Kind of collected item. Drives engagement, half-life, and source attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[serde(alias = "repo")]
    Repository,
    #[serde(alias = "academic")]
    Paper,
    #[serde(alias = "post", alias = "story")]
    Discussion,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ItemKind {
    /// Parses a type discriminator, mapping unrecognized values to [`ItemKind::Unknown`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "repository" | "repo" => Self::Repository,
            "paper" | "academic" => Self::Paper,
            "discussion" | "post" | "story" => Self::Discussion,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Paper => "paper",
            Self::Discussion => "discussion",
            Self::Unknown => "unknown",
        }
    }

    /// Source a kind is attributed to when the item carries no explicit `source`.
    pub fn default_source(&self) -> &'static str {
        match self {
            Self::Repository => "github",
            Self::Paper => "arxiv",
            Self::Discussion => "hackernews",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item as produced by a source collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    /// Stable, source-prefixed identifier (e.g. `github:owner/repo`).
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub collected_at: DateTime<Utc>,
}

impl RawItem {
    pub fn new(id: impl Into<String>, kind: ItemKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            url: String::new(),
            metadata: Metadata::new(),
            collected_at: Utc::now(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets one metadata field.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A raw item after the fetch step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedItem {
    #[serde(flatten)]
    pub raw: RawItem,
    pub fetch_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<RawItem> for FetchedItem {
    fn from(raw: RawItem) -> Self {
        Self {
            raw,
            fetch_success: false,
            content: None,
        }
    }
}

/// Annotations from the optional synthesis step.
///
/// An empty `summary` means the item was not synthesized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub relevance_rationale: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
}

impl Synthesis {
    pub fn is_present(&self) -> bool {
        !self.summary.is_empty()
    }
}

/// The unit the scoring engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedItem {
    #[serde(flatten)]
    pub fetched: FetchedItem,
    #[serde(default)]
    pub synthesis: Synthesis,
}

impl SynthesizedItem {
    pub fn raw(&self) -> &RawItem {
        &self.fetched.raw
    }

    pub fn id(&self) -> &str {
        &self.fetched.raw.id
    }

    pub fn kind(&self) -> ItemKind {
        self.fetched.raw.kind
    }

    pub fn title(&self) -> &str {
        &self.fetched.raw.title
    }

    pub fn metadata(&self) -> &Metadata {
        &self.fetched.raw.metadata
    }

    pub fn with_synthesis(mut self, synthesis: Synthesis) -> Self {
        self.synthesis = synthesis;
        self
    }
}

impl From<FetchedItem> for SynthesizedItem {
    fn from(fetched: FetchedItem) -> Self {
        Self {
            fetched,
            synthesis: Synthesis::default(),
        }
    }
}

impl From<RawItem> for SynthesizedItem {
    fn from(raw: RawItem) -> Self {
        FetchedItem::from(raw).into()
    }
}
