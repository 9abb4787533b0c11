//! Integration tests for the scan launcher.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{FixtureSource, ItemBuilder};
use common::init_tracing;
use crosshunt::{
    Config, ItemSource, JobStatus, JobSummary, RateLimitConfig, RateLimiter, ScanError, ScanMode,
    ScanRequest, ScanService,
};

fn github() -> FixtureSource {
    FixtureSource::new("github")
        .with_items(
            "rust",
            vec![
                ItemBuilder::repo("github:tokio-rs/tokio", "tokio")
                    .stars(25_000)
                    .topics(&["rust", "async"])
                    .build(),
                ItemBuilder::repo("github:rust-lang/rust", "rust").stars(95_000).build(),
            ],
        )
        .with_items(
            "async",
            vec![
                ItemBuilder::repo("github:tokio-rs/tokio", "tokio")
                    .stars(25_000)
                    .topics(&["rust", "async"])
                    .build(),
                ItemBuilder::repo("github:smol-rs/smol", "smol").stars(3_500).build(),
            ],
        )
}

fn hackernews() -> FixtureSource {
    FixtureSource::new("hackernews").with_items(
        "async",
        vec![
            ItemBuilder::discussion("hn:1", "Why async Rust is hard")
                .meta("points", 512)
                .meta("comments", 300)
                .build(),
        ],
    )
}

async fn wait_for_terminal(service: &ScanService, id: &str) -> JobSummary {
    for _ in 0..400 {
        let summary = service.status(id).expect("job should exist");
        if summary.status.is_terminal() {
            return summary;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("scan {id} did not finish");
}

#[tokio::test]
async fn test_submit_poll_and_fetch_report() {
    init_tracing();
    let service = ScanService::new(
        &Config::default(),
        vec![Arc::new(github()), Arc::new(hackernews())],
    );

    let request = ScanRequest::new(["hackernews", "github"], ["rust", "async"]);
    let submitted = service.submit(request).unwrap();
    let done = wait_for_terminal(&service, &submitted.id).await;
    assert_eq!(done.status, JobStatus::Succeeded);
    assert!(done.finished_at.is_some());

    let report = service.result(&submitted.id).unwrap();
    let ids: Vec<&str> = report.items.iter().map(|item| item.id()).collect();
    assert_eq!(ids.len(), 4, "tokio appears once despite two queries");
    assert!(ids.contains(&"github:tokio-rs/tokio"));
    assert!(ids.contains(&"hn:1"));

    let tokio_repo = report
        .items
        .iter()
        .find(|item| item.id() == "github:tokio-rs/tokio")
        .unwrap();
    assert!(tokio_repo.score.factor("cross_hunter_boost").is_some());

    let json = serde_json::to_value(&done).unwrap();
    assert_eq!(json["status"], "succeeded");
    assert_eq!(json["type"], "scan");
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_source_is_throttled() {
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(1))).unwrap());
    let source = Arc::new(
        FixtureSource::new("github")
            .with_items("a", vec![ItemBuilder::repo("gh:a", "a").build()])
            .with_items("b", vec![ItemBuilder::repo("gh:b", "b").build()])
            .with_items("c", vec![ItemBuilder::repo("gh:c", "c").build()])
            .rate_limited(Arc::clone(&limiter)),
    );
    let sources: Vec<Arc<dyn ItemSource>> = vec![source.clone()];
    let service = ScanService::new(&Config::default(), sources);

    let started = tokio::time::Instant::now();
    let report = service
        .run(ScanRequest::new(["github"], ["a", "b", "c"]).with_mode(ScanMode::Quick))
        .await
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(source.calls(), 3);
    assert!(started.elapsed() >= Duration::from_millis(1_990));
}

#[tokio::test]
async fn test_cancel_interrupts_rate_limit_wait() {
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(3600))).unwrap());
    assert!(limiter.try_acquire(), "drain the only token");

    let source = FixtureSource::new("github")
        .with_items("rust", vec![ItemBuilder::repo("gh:1", "rust").build()])
        .rate_limited(limiter);
    let service = ScanService::new(&Config::default(), vec![Arc::new(source)]);

    let job = service.submit(ScanRequest::new(["github"], ["rust"])).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(service.status(&job.id).unwrap().status, JobStatus::Running);

    service.cancel(&job.id).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(service.cache().in_flight(), 0);
    match service.result(&job.id) {
        Err(ScanError::JobFailed { status, .. }) => assert_eq!(status, JobStatus::Canceled),
        other => panic!("expected canceled scan, got {other:?}"),
    }
}

#[tokio::test]
async fn test_finished_scans_are_pruned() {
    let config = Config {
        job_ttl: Duration::from_millis(300),
        max_jobs: 2,
        ..Config::default()
    };
    let service = ScanService::new(&config, vec![Arc::new(github())]);

    let mut ids = Vec::new();
    for query in ["rust", "async", "rust"] {
        let job = service.submit(ScanRequest::new(["github"], [query])).unwrap();
        wait_for_terminal(&service, &job.id).await;
        ids.push(job.id);
    }

    let listed: Vec<String> = service.list().into_iter().map(|job| job.id).collect();
    assert_eq!(listed.len(), 2);
    assert!(!listed.contains(&ids[0]), "oldest finished scan is evicted first");

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(service.status(&ids[2]).is_err());
    assert!(service.list().is_empty());
}

#[tokio::test]
async fn test_scan_modes_use_separate_cache_entries() {
    let source = Arc::new(github());
    let service = ScanService::new(&Config::default(), vec![source.clone()]);

    let quick = ScanRequest::new(["github"], ["rust"]).with_mode(ScanMode::Quick);
    let deep = quick.clone().with_mode(ScanMode::Deep);

    service.run(quick.clone()).await.unwrap();
    service.run(deep).await.unwrap();
    service.run(quick).await.unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(service.cache().len(), 2);
}
