//! Progress reporting for capture fetches
//!
//! The pipeline calls [`ProgressSink::advance`] once per capture attempt,
//! successful or not. Sinks only observe; they never influence the run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Receives one notification per capture attempt
pub trait ProgressSink: Send + Sync {
    /// Called before a site's captures are fetched
    fn start(&self, _label: &str, _total: usize) {}

    /// Called once per capture attempt
    fn advance(&self);
}

/// Discards all progress notifications
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self) {}
}

/// Reports progress through the log
///
/// Logs every `every` attempts and once more when the site is complete.
#[derive(Debug)]
pub struct LogProgress {
    every: usize,
    label: Mutex<String>,
    total: AtomicUsize,
    done: AtomicUsize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            label: Mutex::new(String::new()),
            total: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
        }
    }

    /// Number of attempts recorded since the last `start`
    pub fn completed(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressSink for LogProgress {
    fn start(&self, label: &str, total: usize) {
        if let Ok(mut current) = self.label.lock() {
            *current = label.to_string();
        }
        self.total.store(total, Ordering::SeqCst);
        self.done.store(0, Ordering::SeqCst);
        tracing::info!("Fetching {} robots.txt captures for {}", total, label);
    }

    fn advance(&self) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let total = self.total.load(Ordering::SeqCst);

        if done % self.every == 0 || done == total {
            let label = self
                .label
                .lock()
                .map(|label| label.clone())
                .unwrap_or_default();
            tracing::info!("Progress: {}/{} captures fetched for {}", done, total, label);
        }
    }
}
