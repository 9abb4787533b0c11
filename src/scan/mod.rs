//! Scan launcher: runs hunters, scores and correlates their items, and serves the result
//! through the job store and the deduplicating scan cache.
//!
//! ```text
//! submit(request) ─▶ JobStore::create + start
//!                        │
//!                        ▼
//!         ScanCache::get_or_compute(request.cache_key(), mode ttl)
//!                        │ (miss, first caller only)
//!                        ▼
//!   ItemSource::collect × (hunter, query) ─▶ dedupe ─▶ Scorer ─▶ CorrelationEngine
//! ```

pub mod error;
pub mod request;
pub mod service;
pub mod source;


pub use error::{ScanError, ScanResult};
pub use request::{ScanMode, ScanReport, ScanRequest, SourceFailure};
pub use service::{SCAN_JOB_KIND, ScanService};
pub use source::ItemSource;
