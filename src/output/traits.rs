//! Result sink trait and output errors
//!
//! A sink receives the finished result for one site at a time. Sites are
//! processed sequentially, so implementations never see interleaved calls
//! for the same site.

use crate::timeline::Timeline;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur while writing results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for per-site results
pub trait ResultSink {
    /// Records the flat set of rule URLs seen for `site`
    ///
    /// # Arguments
    ///
    /// * `site` - Site root the paths belong to
    /// * `paths` - Every distinct rule URL, sorted
    fn record_paths(&self, site: &str, paths: &BTreeSet<String>) -> OutputResult<()>;

    /// Records the change timeline for `site`
    ///
    /// # Arguments
    ///
    /// * `site` - Site root the timeline belongs to
    /// * `timeline` - Ordered change events plus raw capture text
    fn record_timeline(&self, site: &str, timeline: &Timeline) -> OutputResult<()>;
}
