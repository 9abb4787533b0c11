use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::RateLimitConfig;
use super::error::{RateLimitError, RateLimitResult};

const MIN_WAIT: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket limiter shared by callers of one external source.
///
/// Refill is computed from elapsed time on each call; there is no background ticker, so an
/// idle limiter costs nothing.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    rate: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Creates a limiter with a full bucket.
    pub fn new(config: RateLimitConfig) -> RateLimitResult<Self> {
        if config.capacity == 0 {
            return Err(RateLimitError::InvalidConfig {
                reason: "capacity must be at least 1".to_string(),
            });
        }
        if config.period.is_zero() {
            return Err(RateLimitError::InvalidConfig {
                reason: "period must be non-zero".to_string(),
            });
        }

        Ok(Self {
            config,
            rate: config.refill_rate(),
            bucket: Mutex::new(Bucket {
                tokens: f64::from(config.capacity),
                last_refill: Instant::now(),
            }),
        })
    }

    /// Creates a limiter with the authenticated or anonymous preset.
    pub fn for_auth(authenticated: bool) -> RateLimitResult<Self> {
        Self::new(RateLimitConfig::for_auth(authenticated))
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            bucket.tokens = (bucket.tokens + elapsed * self.rate).min(f64::from(self.config.capacity));
            bucket.last_refill = now;
        }
    }

    /// Takes a token, or returns how long until one is available.
    fn take(&self) -> Result<(), Duration> {
        let mut bucket = self.bucket.lock();
        self.refill(&mut bucket, Instant::now());
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            // One token never takes longer than a full period to refill.
            let period = self.config.period;
            let secs = (1.0 - bucket.tokens) / self.rate;
            let wait = Duration::try_from_secs_f64(secs).unwrap_or(period).min(period);
            Err(wait.max(MIN_WAIT))
        }
    }

    /// Consumes a token if one is available, without waiting.
    pub fn try_acquire(&self) -> bool {
        self.take().is_ok()
    }

    /// Tokens currently available (fractional).
    pub fn available(&self) -> f64 {
        let mut bucket = self.bucket.lock();
        self.refill(&mut bucket, Instant::now());
        bucket.tokens
    }

    /// Waits for a token, or until `cancel` fires.
    pub async fn wait(&self, cancel: &CancellationToken) -> RateLimitResult<()> {
        loop {
            let delay = match self.take() {
                Ok(()) => return Ok(()),
                Err(delay) => delay,
            };

            debug!(wait_ms = delay.as_millis() as u64, "Rate limiter: waiting for token");
            tokio::select! {
                _ = cancel.cancelled() => return Err(RateLimitError::Cancelled),
                _ = sleep(delay) => {}
            }
        }
    }
}
