use std::time::Duration;

/// Token-bucket shape: `capacity` tokens refilled continuously over `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Bucket size, and the burst allowed from a full bucket.
    pub capacity: u32,
    /// Time to refill an empty bucket.
    pub period: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

impl RateLimitConfig {
    pub fn new(capacity: u32, period: Duration) -> Self {
        Self { capacity, period }
    }

    /// Limits for callers presenting credentials (30 requests per minute).
    pub fn authenticated() -> Self {
        Self::new(30, Duration::from_secs(60))
    }

    /// Limits for anonymous callers (10 requests per minute).
    pub fn unauthenticated() -> Self {
        Self::new(10, Duration::from_secs(60))
    }

    pub fn for_auth(authenticated: bool) -> Self {
        if authenticated {
            Self::authenticated()
        } else {
            Self::unauthenticated()
        }
    }

    /// Tokens added per second.
    pub fn refill_rate(&self) -> f64 {
        f64::from(self.capacity) / self.period.as_secs_f64()
    }
}
