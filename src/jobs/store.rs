use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures_util::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::error::{JobError, JobResult};
use super::types::{
    JOB_CANCELED_MESSAGE, JOB_EXPIRED_MESSAGE, JOB_PANICKED_MESSAGE, Job, JobStatus,
};
use crate::config::Config;
use crate::constants::{DEFAULT_JOB_TTL_SECS, DEFAULT_MAX_JOBS};

/// Retention settings for a [`JobStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStoreConfig {
    /// Queued jobs older than this expire; finished jobs are deleted this long after finishing.
    pub ttl: Duration,
    /// Soft cap on stored jobs. Only terminal jobs are evicted to honor it.
    pub max_jobs: usize,
}

impl Default for JobStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_JOB_TTL_SECS),
            max_jobs: DEFAULT_MAX_JOBS,
        }
    }
}

impl JobStoreConfig {
    pub fn new(ttl: Duration, max_jobs: usize) -> Self {
        Self { ttl, max_jobs }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.job_ttl, config.max_jobs)
    }

    fn ttl_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX)
    }
}

struct JobEntry<T> {
    job: Job<T>,
    cancel: CancellationToken,
}

type JobMap<T> = HashMap<String, JobEntry<T>>;

/// In-memory registry of asynchronous jobs.
///
/// Every job gets a child of the store's root [`CancellationToken`]; canceling a job
/// cancels its token, and [`JobStore::shutdown`] cancels them all. Cloning is cheap and
/// yields a handle to the same store.
pub struct JobStore<T> {
    jobs: Arc<Mutex<JobMap<T>>>,
    config: JobStoreConfig,
    root: CancellationToken,
}

impl<T> Clone for JobStore<T> {
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            config: self.config,
            root: self.root.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> JobStore<T> {
    pub fn new(config: JobStoreConfig) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            config,
            root: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &JobStoreConfig {
        &self.config
    }

    /// Registers a new queued job of the given type and returns its snapshot.
    pub fn create(&self, kind: &str) -> Job<T> {
        let now = Utc::now();
        let job = Job::new(Uuid::new_v4().to_string(), kind.to_string(), now);
        let snapshot = job.clone();

        let mut jobs = self.jobs.lock();
        jobs.insert(
            job.id.clone(),
            JobEntry {
                job,
                cancel: self.root.child_token(),
            },
        );
        prune(&mut jobs, &self.config, now);
        debug!(job_id = %snapshot.id, kind, "Job created");
        snapshot
    }

    /// Marks a queued job running and launches `task` on the Tokio runtime.
    ///
    /// `task` receives the job's cancellation token. Its outcome is recorded only if the
    /// job is still running when it completes; a panicking task fails the job with
    /// [`JOB_PANICKED_MESSAGE`]. Must be called from within a runtime.
    #[instrument(skip(self, task))]
    pub fn start<F, Fut>(&self, id: &str, task: F) -> JobResult<()>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let token = {
            let mut jobs = self.jobs.lock();
            let now = Utc::now();
            prune(&mut jobs, &self.config, now);

            let entry = jobs.get_mut(id).ok_or_else(|| JobError::NotFound { id: id.to_string() })?;
            if entry.job.status != JobStatus::Queued {
                return Err(JobError::NotQueued {
                    id: id.to_string(),
                    status: entry.job.status,
                });
            }
            entry.job.status = JobStatus::Running;
            entry.job.started_at = Some(now);
            entry.job.updated_at = now;
            entry.cancel.clone()
        };

        info!("Job started");
        let store = self.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(async move { task(token).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(anyhow::anyhow!(JOB_PANICKED_MESSAGE)));
            store.finish(&id, outcome);
        });
        Ok(())
    }

    fn finish(&self, id: &str, outcome: anyhow::Result<T>) {
        let mut jobs = self.jobs.lock();
        let now = Utc::now();

        match jobs.get_mut(id) {
            Some(entry) if entry.job.status == JobStatus::Running => {
                match outcome {
                    Ok(value) => {
                        entry.job.status = JobStatus::Succeeded;
                        entry.job.result = Some(value);
                        info!(job_id = id, "Job succeeded");
                    }
                    Err(e) => {
                        entry.job.status = JobStatus::Failed;
                        entry.job.error = Some(format!("{e:#}"));
                        warn!(job_id = id, error = %e, "Job failed");
                    }
                }
                entry.job.finished_at = Some(now);
                entry.job.updated_at = now;
            }
            Some(entry) => {
                debug!(job_id = id, status = %entry.job.status, "Ignoring late job outcome");
            }
            None => debug!(job_id = id, "Ignoring outcome of removed job"),
        }

        prune(&mut jobs, &self.config, now);
    }

    /// Cancels a non-terminal job and signals its token.
    pub fn cancel(&self, id: &str) -> JobResult<Job<T>> {
        let mut jobs = self.jobs.lock();
        let now = Utc::now();
        prune(&mut jobs, &self.config, now);

        let entry = jobs.get_mut(id).ok_or_else(|| JobError::NotFound { id: id.to_string() })?;
        if !entry.job.status.is_cancelable() {
            return Err(JobError::AlreadyTerminal {
                id: id.to_string(),
                status: entry.job.status,
            });
        }

        entry.cancel.cancel();
        entry.job.status = JobStatus::Canceled;
        entry.job.error = Some(JOB_CANCELED_MESSAGE.to_string());
        entry.job.finished_at = Some(now);
        entry.job.updated_at = now;
        info!(job_id = id, "Job canceled");
        Ok(entry.job.clone())
    }

    /// Returns an independent snapshot of the job.
    pub fn get(&self, id: &str) -> JobResult<Job<T>> {
        let mut jobs = self.jobs.lock();
        prune(&mut jobs, &self.config, Utc::now());
        jobs.get(id)
            .map(|entry| entry.job.clone())
            .ok_or_else(|| JobError::NotFound { id: id.to_string() })
    }

    /// Snapshots of all retained jobs, oldest first.
    pub fn list(&self) -> Vec<Job<T>> {
        let mut jobs = self.jobs.lock();
        prune(&mut jobs, &self.config, Utc::now());
        let mut snapshot: Vec<Job<T>> = jobs.values().map(|entry| entry.job.clone()).collect();
        snapshot.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        snapshot
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signals every job's cancellation token. Statuses are left untouched.
    pub fn shutdown(&self) {
        info!(jobs = self.len(), "Job store shutting down");
        self.root.cancel();
    }
}

impl<T: Clone + Send + 'static> Default for JobStore<T> {
    fn default() -> Self {
        Self::new(JobStoreConfig::default())
    }
}

impl<T> std::fmt::Debug for JobStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStore")
            .field("jobs", &self.jobs.lock().len())
            .field("config", &self.config)
            .finish()
    }
}

/// Expires stale unscheduled jobs, deletes finished jobs past retention, then evicts the
/// oldest terminal jobs while over `max_jobs`. Active jobs are never evicted.
fn prune<T>(jobs: &mut JobMap<T>, config: &JobStoreConfig, now: DateTime<Utc>) {
    let ttl = config.ttl_delta();

    for entry in jobs.values_mut() {
        if entry.job.status.is_unscheduled() && now - entry.job.created_at > ttl {
            entry.cancel.cancel();
            entry.job.status = JobStatus::Expired;
            entry.job.error = Some(JOB_EXPIRED_MESSAGE.to_string());
            entry.job.finished_at = Some(now);
            entry.job.updated_at = now;
            debug!(job_id = %entry.job.id, "Job expired");
        }
    }

    let before = jobs.len();
    jobs.retain(|_, entry| {
        !(entry.job.status.is_terminal()
            && entry.job.finished_at.is_some_and(|finished| now - finished > ttl))
    });
    let retired = before - jobs.len();

    let mut evicted = 0;
    while jobs.len() > config.max_jobs {
        let oldest = jobs
            .values()
            .filter(|entry| entry.job.status.is_terminal())
            .min_by(|a, b| a.job.created_at.cmp(&b.job.created_at))
            .map(|entry| entry.job.id.clone());
        let Some(id) = oldest else {
            break;
        };
        jobs.remove(&id);
        evicted += 1;
    }

    if retired > 0 || evicted > 0 {
        debug!(retired, evicted, remaining = jobs.len(), "Pruned jobs");
    }
}
