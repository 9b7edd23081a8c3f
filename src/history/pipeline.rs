//! Fetch pipeline
//!
//! A fixed pool of workers drains a shared queue of capture identifiers,
//! fetches each capture and parses it. The queue is filled and closed before
//! the workers start pulling; results go to a second channel that is only
//! drained after every worker has finished.

use crate::archive::{FetchOutcome, SnapshotId, SnapshotSource};
use crate::history::progress::ProgressSink;
use crate::robots::{parse_robots, SnapshotContent};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use url::Url;

/// Default number of concurrent capture fetches
pub const DEFAULT_WORKERS: usize = 10;

/// Worker pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Number of concurrent workers (at least one is always started)
    pub workers: usize,

    /// Keep the raw robots.txt text next to the parsed rules
    pub keep_raw: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            keep_raw: false,
        }
    }
}

/// Fetches and parses every capture in `ids`
///
/// Captures that cannot be fetched are dropped without error. The returned
/// snapshots are in no particular order; sort by [`SnapshotId`] before
/// folding them into a timeline.
///
/// # Arguments
///
/// * `source` - Where capture content comes from
/// * `site` - Site root whose robots.txt is being fetched
/// * `ids` - Captures to fetch
/// * `options` - Worker count and raw-text retention
/// * `progress` - Notified once per capture attempt
pub async fn fetch_snapshots<S>(
    source: Arc<S>,
    site: &str,
    ids: Vec<SnapshotId>,
    options: PipelineOptions,
    progress: Arc<dyn ProgressSink>,
) -> Result<Vec<SnapshotContent>, url::ParseError>
where
    S: SnapshotSource + Send + Sync + 'static,
{
    let base = Url::parse(site)?;
    let total = ids.len();

    // Enqueue everything up front, then close the queue
    let (work_tx, work_rx) = mpsc::unbounded_channel::<SnapshotId>();
    for id in ids {
        // The receiver is still held here, so sending cannot fail
        let _ = work_tx.send(id);
    }
    drop(work_tx);
    let queue = Arc::new(Mutex::new(work_rx));

    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<SnapshotContent>();

    let worker_count = options.workers.max(1).min(total.max(1));
    let mut handles = Vec::with_capacity(worker_count);

    for worker in 0..worker_count {
        let source = Arc::clone(&source);
        let progress = Arc::clone(&progress);
        let queue = Arc::clone(&queue);
        let results = result_tx.clone();
        let site = site.to_string();
        let base = base.clone();

        handles.push(tokio::spawn(async move {
            loop {
                let next = queue.lock().await.recv().await;
                let Some(id) = next else {
                    break;
                };

                let outcome = source.fetch_snapshot(&id, &site).await;
                progress.advance();

                match outcome {
                    FetchOutcome::Content(text) => {
                        let rules = parse_robots(&text, &base);
                        let mut content = SnapshotContent::new(id, rules);
                        if options.keep_raw {
                            content = content.with_raw(text);
                        }
                        if results.send(content).is_err() {
                            break;
                        }
                    }
                    FetchOutcome::Unavailable { reason } => {
                        tracing::debug!(worker, "Skipping capture {}: {}", id, reason);
                    }
                }
            }
        }));
    }
    drop(result_tx);

    // Barrier: every worker finishes before results are consumed
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::warn!("Fetch worker failed: {}", e);
        }
    }

    let mut snapshots = Vec::with_capacity(total);
    while let Some(snapshot) = result_rx.recv().await {
        snapshots.push(snapshot);
    }

    tracing::debug!(
        "Fetched {} of {} captures for {}",
        snapshots.len(),
        total,
        site
    );

    Ok(snapshots)
}
