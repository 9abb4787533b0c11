use thiserror::Error;

use crate::cache::CacheError;
use crate::jobs::{JobError, JobStatus};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan request names no hunters")]
    NoHunters,

    #[error("unknown hunter: {name}")]
    UnknownHunter { name: String },

    #[error("scan request has no queries")]
    EmptyQueries,

    #[error("failed to derive cache key: {0}")]
    CacheKey(#[from] serde_json::Error),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("scan {id} is still {status}")]
    NotFinished { id: String, status: JobStatus },

    #[error("scan {id} {status}: {message}")]
    JobFailed {
        id: String,
        status: JobStatus,
        message: String,
    },
}

pub type ScanResult<T> = Result<T, ScanError>;
