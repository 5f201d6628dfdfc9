//! One refresh cycle: fan out over every enabled source, normalize each
//! body per source kind, merge the batches in memory, and upsert the
//! survivors. One source failing or timing out never blocks the others.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::Result;
use crate::domain::{NewItem, Source, SourceKind};
use crate::fetcher::{Fetcher, HtmlExtractor};
use crate::normalizer::{dedup, Normalizer};
use crate::store::Store;

pub const DEFAULT_WORKERS: usize = 10;

/// A per-source failure recorded during a cycle, surfaced to the caller
/// instead of aborting the refresh.
#[derive(Debug, Clone)]
pub struct SourceIssue {
    pub source_id: String,
    pub url: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub run_id: u64,
    pub new_items: usize,
    pub issues: Vec<SourceIssue>,
}

#[derive(Debug, Clone)]
pub enum RefreshStatus {
    Completed(RefreshOutcome),
    /// A cycle was already in flight; the request is dropped, not queued.
    Skipped,
    /// A newer cycle started while this one was fetching; its results
    /// were discarded on arrival.
    Stale { run_id: u64 },
}

pub struct Refresher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    extractor: Arc<HtmlExtractor>,
    normalizer: Normalizer,
    semaphore: Arc<Semaphore>,
    in_flight: AtomicBool,
    run_seq: AtomicU64,
}

impl Refresher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(HtmlExtractor::new()),
            normalizer: Normalizer::new(),
            semaphore: Arc::new(Semaphore::new(workers)),
            in_flight: AtomicBool::new(false),
            run_seq: AtomicU64::new(0),
        }
    }

    /// Fetch and normalize one source outside a full cycle (used when a
    /// source is first added). Same kind dispatch as the cycle path.
    pub async fn fetch_single(&self, source: &Source) -> Result<Vec<NewItem>> {
        fetch_source(&self.fetcher, &self.extractor, &self.normalizer, source).await
    }

    pub async fn refresh<S: Store + Send + Sync + 'static>(
        &self,
        store: Arc<S>,
    ) -> Result<RefreshStatus> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("refresh already in flight, ignoring request");
            return Ok(RefreshStatus::Skipped);
        }
        let run_id = self.run_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.run_cycle(run_id, store).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run_cycle<S: Store + Send + Sync + 'static>(
        &self,
        run_id: u64,
        store: Arc<S>,
    ) -> Result<RefreshStatus> {
        let sources = store.get_enabled_sources()?;
        if sources.is_empty() {
            return Ok(RefreshStatus::Completed(RefreshOutcome {
                run_id,
                new_items: 0,
                issues: Vec::new(),
            }));
        }

        let mut handles = Vec::new();
        for source in sources {
            if source.kind == SourceKind::Email {
                tracing::debug!("skipping email source {}", source.id);
                continue;
            }

            let fetcher = self.fetcher.clone();
            let extractor = self.extractor.clone();
            let normalizer = self.normalizer.clone();
            let semaphore = self.semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("Semaphore closed");
                let result = fetch_source(&fetcher, &extractor, &normalizer, &source).await;
                (source, result)
            });
            handles.push(handle);
        }

        let mut batch: Vec<NewItem> = Vec::new();
        let mut issues = Vec::new();
        for joined in futures::future::join_all(handles).await {
            match joined {
                Ok((source, Ok(items))) => {
                    tracing::debug!("{} items from {}", items.len(), source.url);
                    batch.extend(items);
                }
                Ok((source, Err(e))) => {
                    issues.push(SourceIssue {
                        source_id: source.id,
                        url: source.url,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        // Results from a superseded cycle are discarded rather than
        // overwriting the newer cycle's view.
        if self.run_seq.load(Ordering::SeqCst) != run_id {
            tracing::debug!("run {} superseded, discarding results", run_id);
            return Ok(RefreshStatus::Stale { run_id });
        }

        let merged = dedup::merge(batch);
        let new_items = store.upsert_items(&merged)?;
        tracing::info!(
            run_id,
            new_items,
            issues = issues.len(),
            "refresh cycle complete"
        );

        Ok(RefreshStatus::Completed(RefreshOutcome {
            run_id,
            new_items,
            issues,
        }))
    }
}

async fn fetch_source(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    extractor: &HtmlExtractor,
    normalizer: &Normalizer,
    source: &Source,
) -> Result<Vec<NewItem>> {
    let body = fetcher.fetch(&source.url).await?;
    match source.kind {
        SourceKind::Rss => {
            let (_meta, items) = normalizer.normalize(source, &body)?;
            Ok(items)
        }
        SourceKind::Html => {
            let html = String::from_utf8_lossy(&body);
            Ok(extractor.extract(source, &html))
        }
        SourceKind::Email => Ok(Vec::new()),
    }
}
