//! Asynchronous job lifecycle: creation, launch, polling, cancellation and pruning.
//!
//! ```text
//! queued ──start──▶ running ──▶ succeeded | failed
//!   │                  │
//!   ├──cancel──────────┴──────▶ canceled
//!   └──ttl elapsed────────────▶ expired
//! ```
//!
//! Terminal jobs are deleted once they have been finished for longer than the TTL, and the
//! oldest terminal jobs are evicted when the store grows past `max_jobs`.

pub mod error;
pub mod store;
pub mod types;


pub use error::{JobError, JobResult};
pub use store::{JobStore, JobStoreConfig};
pub use types::{
    JOB_CANCELED_MESSAGE, JOB_EXPIRED_MESSAGE, JOB_PANICKED_MESSAGE, Job, JobStatus, JobSummary,
};
