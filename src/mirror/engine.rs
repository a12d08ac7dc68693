// src/mirror/engine.rs
// =============================================================================
// The crawl engine: owns the frontier and runs the worker pool.
//
// How a crawl goes:
// 1. seed("index.html") claims the entry page, downloads it right away and
//    queues every resource it links to
// 2. run_to_completion(n) starts n workers; each pulls items, downloads
//    them, and feeds the links found in text files back into the frontier
// 3. When every worker has given up waiting for more work, we return a
//    CrawlSummary
//
// All crawl state lives in one CrawlEngine, so two crawls (or two tests)
// never share queues or dedup maps.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::error::CrawlError;
use crate::fetch::{Fetched, Fetcher, Storage, Transport};
use crate::links::{discover_links, RemotePath, ResourceKind};

use super::frontier::{Frontier, WorkItem};
use super::summary::CrawlSummary;
use super::worker::run_worker;

// Knobs for one crawl
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Root directory of the mirror
    pub destination: PathBuf,
    /// How many empty polls in a row a worker tolerates before exiting
    pub idle_retries: u32,
    /// Sleep between empty polls
    pub retry_delay: Duration,
    /// How often the progress line is logged
    pub progress_interval: Duration,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("mirror"),
            idle_retries: 3,
            retry_delay: Duration::from_millis(500),
            progress_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Default)]
struct Counters {
    downloaded: AtomicUsize,
    skipped_existing: AtomicUsize,
    failed: AtomicUsize,
    ignored_links: AtomicUsize,
    anomalies: AtomicUsize,
}

// State shared by every worker of one crawl
pub(super) struct Shared {
    pub(super) config: MirrorConfig,
    pub(super) frontier: Frontier,
    fetcher: Fetcher,
    counters: Counters,
}

impl Shared {
    // Claims `path` and, if we won, queues it
    //
    // The parent directory is created before the item becomes visible to
    // other workers. If that fails the path stays Claimed and is never
    // fetched.
    async fn discover(&self, path: RemotePath, kind: ResourceKind) -> Result<bool, CrawlError> {
        if !self.frontier.claim(&path) {
            return Ok(false);
        }

        let item = WorkItem::new(path, kind, &self.config.destination);
        if let Some(parent) = item.local.parent() {
            self.fetcher
                .storage()
                .ensure_directory(parent)
                .await
                .map_err(CrawlError::storage(parent))?;
        }
        self.frontier.enqueue(item);
        Ok(true)
    }

    // Downloads one item and, for text, queues everything it links to
    pub(super) async fn process(&self, worker: usize, item: WorkItem) -> Result<(), CrawlError> {
        let fetched = self.fetcher.fetch(&item).await?;

        if fetched.was_written() {
            self.counters.downloaded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.skipped_existing.fetch_add(1, Ordering::Relaxed);
        }

        if let Fetched::Text { content, .. } = &fetched {
            self.follow_links(&item.path, content).await;
        }

        tracing::debug!(worker, path = %item.path, "processed");
        self.frontier.materialize(&item.path, item.local);
        Ok(())
    }

    async fn follow_links(&self, page: &RemotePath, content: &str) {
        let found = discover_links(page, content);

        self.counters
            .ignored_links
            .fetch_add(found.ignored, Ordering::Relaxed);
        for anomaly in &found.anomalies {
            self.counters.anomalies.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("skipping link: {}", anomaly);
        }

        let mut added = 0;
        for (path, kind) in found.resources {
            match self.discover(path, kind).await {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("could not queue link from {}: {}", page, e);
                }
            }
        }

        if added > 0 {
            tracing::info!(page = %page, "added {} file(s) to process", added);
        }
    }

    pub(super) fn record_failure(&self, worker: usize, error: &CrawlError) {
        self.counters.failed.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(worker, "{}", error);
    }

    fn summary(&self, workers: usize, elapsed: Duration) -> CrawlSummary {
        CrawlSummary {
            discovered: self.frontier.discovered(),
            materialized: self.frontier.materialized(),
            failed: self.counters.failed.load(Ordering::Relaxed),
            downloaded: self.counters.downloaded.load(Ordering::Relaxed),
            skipped_existing: self.counters.skipped_existing.load(Ordering::Relaxed),
            ignored_links: self.counters.ignored_links.load(Ordering::Relaxed),
            anomalies: self.counters.anomalies.load(Ordering::Relaxed),
            workers,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

pub struct CrawlEngine {
    shared: Arc<Shared>,
}

impl CrawlEngine {
    pub fn new(config: MirrorConfig, transport: Arc<dyn Transport>, storage: Arc<dyn Storage>) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                frontier: Frontier::new(),
                fetcher: Fetcher::new(transport, storage),
                counters: Counters::default(),
            }),
        }
    }

    #[cfg(test)]
    pub fn frontier(&self) -> &Frontier {
        &self.shared.frontier
    }

    // Primes the frontier with the entry page and downloads it
    //
    // Returns how many items are queued afterwards, i.e. how many files the
    // entry page led us to. Seeding the same engine twice is a no-op.
    pub async fn seed(&self, entry: &str) -> Result<usize, CrawlError> {
        let path = RemotePath::new(entry);
        let kind = path.kind().ok_or_else(|| {
            CrawlError::Configuration(format!("entry '{}' is not a page or asset we mirror", path))
        })?;

        if self.shared.discover(path, kind).await? {
            if let Some(item) = self.shared.frontier.next() {
                let result = self.shared.process(0, item).await;
                if let Err(e) = &result {
                    self.shared.record_failure(0, e);
                }
                result?;
            }
        }

        Ok(self.shared.frontier.queued())
    }

    // Runs `workers` workers until all of them exit
    pub async fn run_to_completion(&self, workers: usize) -> Result<CrawlSummary, CrawlError> {
        if workers == 0 {
            return Err(CrawlError::Configuration(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.shared.frontier.discovered() == 0 {
            return Err(CrawlError::Configuration(
                "crawl was not seeded with an entry page".to_string(),
            ));
        }

        let started = Instant::now();
        tracing::info!(
            workers,
            queued = self.shared.frontier.queued(),
            "starting workers"
        );

        let reporter = tokio::spawn(report_progress(self.shared.clone()));

        let handles = (1..=workers).map(|id| tokio::spawn(run_worker(id, self.shared.clone())));
        for result in join_all(handles).await {
            match result {
                Ok(report) => tracing::debug!(
                    worker = report.id,
                    processed = report.processed,
                    failed = report.failed,
                    "worker finished"
                ),
                Err(e) => {
                    // A panicking worker loses its current item, like a failed fetch
                    self.shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("worker task failed: {}", e);
                }
            }
        }
        reporter.abort();

        let summary = self.shared.summary(workers, started.elapsed());
        tracing::info!(
            discovered = summary.discovered,
            materialized = summary.materialized,
            failed = summary.failed,
            "crawl finished"
        );
        Ok(summary)
    }
}

// Logs queue depth and completed count whenever the latter changes
//
// Only reads the frontier's counters, never locks anything on its own.
async fn report_progress(shared: Arc<Shared>) {
    let mut ticker = tokio::time::interval(shared.config.progress_interval);
    let mut last_completed = None;

    loop {
        ticker.tick().await;
        let completed = shared.frontier.materialized();
        if last_completed != Some(completed) {
            last_completed = Some(completed);
            tracing::info!(
                "current workload: {:04}, completed: {}",
                shared.frontier.queued(),
                completed
            );
        }
    }
}
