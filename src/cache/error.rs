use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CacheError {
    /// The computation returned an error. Every caller that waited on the same key receives
    /// the same shared error.
    #[error("computation failed: {0:#}")]
    Computation(Arc<anyhow::Error>),

    /// The computing caller was dropped before producing a result.
    #[error("computation abandoned before completion")]
    Abandoned,
}

impl CacheError {
    /// Returns the shared computation error, if any.
    pub fn computation(&self) -> Option<&Arc<anyhow::Error>> {
        match self {
            CacheError::Computation(err) => Some(err),
            CacheError::Abandoned => None,
        }
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
