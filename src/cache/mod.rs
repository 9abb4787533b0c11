//! Scan result cache: TTL expiry, LRU eviction, and in-flight deduplication.

pub mod error;
pub mod scan;


pub use error::{CacheError, CacheResult};
pub use scan::{MAX_TTL, ScanCache};
