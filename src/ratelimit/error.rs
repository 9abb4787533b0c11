use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("rate limit wait canceled")]
    Cancelled,

    #[error("invalid rate limit configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type RateLimitResult<T> = Result<T, RateLimitError>;
