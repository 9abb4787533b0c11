use thiserror::Error;

use super::types::JobStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("job not found: {id}")]
    NotFound { id: String },

    #[error("job {id} cannot start: status is {status}")]
    NotQueued { id: String, status: JobStatus },

    #[error("job {id} is already {status}")]
    AlreadyTerminal { id: String, status: JobStatus },
}

pub type JobResult<T> = Result<T, JobError>;
