//! Token-bucket rate limiting for source-fetching collaborators.

pub mod config;
pub mod error;
pub mod limiter;


pub use config::RateLimitConfig;
pub use error::{RateLimitError, RateLimitResult};
pub use limiter::RateLimiter;
