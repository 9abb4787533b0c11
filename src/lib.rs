//! Crosshunt library crate: the scoring, correlation and scan-execution core of a research
//! aggregator.
//!
//! # Public API Surface
//!
//! ## Items & Scoring
//! - [`RawItem`], [`FetchedItem`], [`SynthesizedItem`] - Pipeline items with a metadata bag
//! - [`Scorer`], [`QualityScore`], [`ScoredItem`] - Five-factor quality scoring
//! - [`CorrelationEngine`], [`CorrelatedTopic`] - Cross-source topic boosting
//!
//! ## Execution
//! - [`ScanCache`] - TTL + LRU cache with in-flight deduplication
//! - [`JobStore`], [`Job`], [`JobStatus`] - Asynchronous job lifecycle
//! - [`ScanService`], [`ScanRequest`], [`ItemSource`] - Scan launcher tying the above together
//! - [`RateLimiter`] - Token bucket for source-fetching collaborators
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - Environment-backed settings
//! - Hashing helpers for cache keys

pub mod cache;
pub mod config;
pub mod constants;
pub mod correlation;
pub mod hashing;
pub mod item;
pub mod jobs;
pub mod ratelimit;
pub mod scan;
pub mod scoring;

pub use cache::{CacheError, CacheResult, ScanCache};
pub use config::{
    Config, ConfigError, CorrelationConfig, HalfLives, ModeTtls, ScoreThresholds, ScoreWeights,
};
pub use correlation::{CorrelatedTopic, CorrelationEngine};
pub use hashing::{canonical_json, hash_canonical_json, hash_hex};
pub use item::{
    FetchedItem, ItemKind, Metadata, MetadataExt, RawItem, Synthesis, SynthesizedItem,
};
pub use jobs::{Job, JobError, JobResult, JobStatus, JobStore, JobStoreConfig, JobSummary};
pub use ratelimit::{RateLimitConfig, RateLimitError, RateLimitResult, RateLimiter};
pub use scan::{
    ItemSource, SCAN_JOB_KIND, ScanError, ScanMode, ScanReport, ScanRequest, ScanResult,
    ScanService, SourceFailure,
};
pub use scoring::{QualityLevel, QualityScore, ScoredItem, Scorer, temporal_decay};
