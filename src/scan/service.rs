use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::{ScanError, ScanResult};
use super::request::{ScanReport, ScanRequest, SourceFailure};
use super::source::ItemSource;
use crate::cache::ScanCache;
use crate::config::{Config, ModeTtls};
use crate::correlation::CorrelationEngine;
use crate::item::SynthesizedItem;
use crate::jobs::{JobStatus, JobStore, JobStoreConfig, JobSummary};
use crate::scoring::Scorer;

/// Job type recorded for scans.
pub const SCAN_JOB_KIND: &str = "scan";

/// Stateless part of a scan: sources plus the scoring and correlation engines.
struct ScanPipeline {
    sources: BTreeMap<String, Arc<dyn ItemSource>>,
    scorer: Scorer,
    correlation: CorrelationEngine,
}

impl ScanPipeline {
    #[instrument(
        skip(self, request, cancel),
        fields(hunters = request.hunters.len(), queries = request.queries.len(), mode = %request.mode)
    )]
    async fn execute(
        &self,
        request: ScanRequest,
        cancel: CancellationToken,
    ) -> anyhow::Result<Arc<ScanReport>> {
        let queries = request.effective_queries();
        let mut calls = Vec::new();
        for hunter in request.normalized_hunters() {
            let Some(source) = self.sources.get(hunter) else {
                bail!("unknown hunter: {hunter}");
            };
            for &query in &queries {
                let targets = request.targets.as_slice();
                let cancel = &cancel;
                calls.push(async move {
                    let outcome = source.collect(query, targets, cancel).await;
                    (hunter, query, outcome)
                });
            }
        }

        let total = calls.len();
        let outcomes = tokio::select! {
            _ = cancel.cancelled() => bail!("scan canceled"),
            outcomes = join_all(calls) => outcomes,
        };

        let now = Utc::now();
        let mut seen = HashSet::new();
        let mut scored = Vec::new();
        let mut failures = Vec::new();
        for (hunter, query, outcome) in outcomes {
            match outcome {
                Ok(items) => {
                    let fresh: Vec<SynthesizedItem> = items
                        .into_iter()
                        .filter(|item| seen.insert(item.id().to_string()))
                        .collect();
                    scored.extend(self.scorer.score_batch(fresh, query, now));
                }
                Err(e) => {
                    warn!(hunter, query, error = %e, "Source collection failed");
                    failures.push(SourceFailure {
                        hunter: hunter.to_string(),
                        query: query.to_string(),
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        if total > 0 && failures.len() == total {
            bail!(
                "all {total} source collections failed; first error: {}",
                failures[0].error
            );
        }

        let (mut items, topics) = self.correlation.correlate_and_boost(scored);
        items.sort_by(|a, b| b.score.value.total_cmp(&a.score.value));

        info!(
            items = items.len(),
            topics = topics.len(),
            failures = failures.len(),
            "Scan complete"
        );
        Ok(Arc::new(ScanReport {
            items,
            topics,
            failures,
            generated_at: now,
        }))
    }
}

/// Runs scans as asynchronous jobs backed by a deduplicating result cache.
///
/// Identical requests share one computation while it runs and one cached report until the
/// mode's TTL elapses. Cloning is cheap; clones share sources, cache, and jobs.
#[derive(Clone)]
pub struct ScanService {
    pipeline: Arc<ScanPipeline>,
    cache: ScanCache<Arc<ScanReport>>,
    jobs: JobStore<Arc<ScanReport>>,
    mode_ttls: ModeTtls,
}

impl ScanService {
    /// Builds a service over `sources`. A later source with a duplicate name replaces an earlier one.
    pub fn new(config: &Config, sources: Vec<Arc<dyn ItemSource>>) -> Self {
        let mut registry = BTreeMap::new();
        for source in sources {
            let name = source.name().to_string();
            if registry.insert(name.clone(), source).is_some() {
                warn!(hunter = %name, "Duplicate hunter registered; keeping the last one");
            }
        }
        debug!(hunters = registry.len(), "Scan service ready");

        Self {
            pipeline: Arc::new(ScanPipeline {
                sources: registry,
                scorer: Scorer::from_config(config),
                correlation: CorrelationEngine::new(config.correlation),
            }),
            cache: ScanCache::new(config.cache_capacity),
            jobs: JobStore::new(JobStoreConfig::from_config(config)),
            mode_ttls: config.mode_ttls,
        }
    }

    /// Registered hunter names, sorted.
    pub fn hunters(&self) -> Vec<&str> {
        self.pipeline.sources.keys().map(String::as_str).collect()
    }

    pub fn cache(&self) -> &ScanCache<Arc<ScanReport>> {
        &self.cache
    }

    pub fn jobs(&self) -> &JobStore<Arc<ScanReport>> {
        &self.jobs
    }

    fn validate(&self, request: &ScanRequest) -> ScanResult<()> {
        if request.hunters.is_empty() {
            return Err(ScanError::NoHunters);
        }
        if let Some(name) = request
            .hunters
            .iter()
            .find(|name| !self.pipeline.sources.contains_key(name.as_str()))
        {
            return Err(ScanError::UnknownHunter { name: name.clone() });
        }
        if request.effective_queries().is_empty() {
            return Err(ScanError::EmptyQueries);
        }
        Ok(())
    }

    /// Queues a scan job and starts it. Must be called from within a Tokio runtime.
    #[instrument(skip(self, request), fields(mode = %request.mode))]
    pub fn submit(&self, request: ScanRequest) -> ScanResult<JobSummary> {
        self.validate(&request)?;
        let key = request.cache_key()?;
        let ttl = request.mode.ttl(&self.mode_ttls);

        let job = self.jobs.create(SCAN_JOB_KIND);
        let cache = self.cache.clone();
        let pipeline = Arc::clone(&self.pipeline);
        self.jobs.start(&job.id, move |cancel| async move {
            cache
                .get_or_compute(&key, ttl, || pipeline.execute(request, cancel))
                .await
                .map_err(anyhow::Error::from)
        })?;

        info!(job_id = %job.id, "Scan submitted");
        Ok(self.jobs.get(&job.id)?.summary())
    }

    pub fn status(&self, id: &str) -> ScanResult<JobSummary> {
        Ok(self.jobs.get(id)?.summary())
    }

    /// The finished report, or why there is none.
    pub fn result(&self, id: &str) -> ScanResult<Arc<ScanReport>> {
        let job = self.jobs.get(id)?;
        if job.status == JobStatus::Succeeded {
            if let Some(report) = job.result {
                return Ok(report);
            }
        }
        if !job.status.is_terminal() {
            return Err(ScanError::NotFinished {
                id: job.id,
                status: job.status,
            });
        }
        Err(ScanError::JobFailed {
            id: job.id,
            status: job.status,
            message: job.error.unwrap_or_default(),
        })
    }

    pub fn cancel(&self, id: &str) -> ScanResult<JobSummary> {
        Ok(self.jobs.cancel(id)?.summary())
    }

    /// Summaries of all retained scan jobs, oldest first.
    pub fn list(&self) -> Vec<JobSummary> {
        self.jobs.list().iter().map(|job| job.summary()).collect()
    }

    /// Runs a scan inline through the same cache, without creating a job.
    #[instrument(skip(self, request), fields(mode = %request.mode))]
    pub async fn run(&self, request: ScanRequest) -> ScanResult<Arc<ScanReport>> {
        self.validate(&request)?;
        let key = request.cache_key()?;
        let ttl = request.mode.ttl(&self.mode_ttls);
        let pipeline = &self.pipeline;
        let report = self
            .cache
            .get_or_compute(&key, ttl, || pipeline.execute(request, CancellationToken::new()))
            .await?;
        Ok(report)
    }

    /// Signals cancellation to every running scan.
    pub fn shutdown(&self) {
        self.jobs.shutdown();
    }
}

impl std::fmt::Debug for ScanService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanService")
            .field("hunters", &self.hunters())
            .field("cache", &self.cache)
            .field("jobs", &self.jobs)
            .finish()
    }
}
