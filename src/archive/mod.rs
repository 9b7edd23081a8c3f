//! Snapshot archive access
//!
//! The archive is seen through two traits: a [`SnapshotIndex`] that lists the
//! captures of a site's robots.txt, and a [`SnapshotSource`] that returns the
//! stored text of one capture. [`WaybackClient`] implements both over HTTP.

mod wayback;

pub use wayback::{build_http_client, parse_capture_rows, WaybackClient};

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Timestamp layout used by archive capture identifiers
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Errors that can occur while talking to the snapshot index
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode index response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid year filter: {0}")]
    InvalidYear(i32),
}

/// Identifier of one archived capture (a `YYYYMMDDhhmmss` timestamp)
///
/// Ordering is plain string ordering, which is chronological for
/// fixed-width timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A capture listing request for one site's robots.txt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureQuery {
    /// Site root, e.g. `https://example.com`
    pub site: String,

    /// Earliest capture timestamp to include
    pub from: Option<String>,

    /// Latest capture timestamp to include
    pub to: Option<String>,

    /// Ask the index for only the N most recent captures
    pub most_recent: Option<usize>,
}

impl CaptureQuery {
    /// Every capture of the site's robots.txt
    pub fn all(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            from: None,
            to: None,
            most_recent: None,
        }
    }

    /// Only the `count` most recent captures
    pub fn most_recent(site: impl Into<String>, count: usize) -> Self {
        Self {
            most_recent: Some(count),
            ..Self::all(site)
        }
    }

    /// Captures within one calendar year
    ///
    /// # Examples
    ///
    /// ```
    /// use robots_history::archive::CaptureQuery;
    ///
    /// let query = CaptureQuery::for_year("https://example.com", 2023).unwrap();
    /// assert_eq!(query.from.as_deref(), Some("20230101000000"));
    /// assert_eq!(query.to.as_deref(), Some("20231231235959"));
    /// ```
    pub fn for_year(site: impl Into<String>, year: i32) -> Result<Self, ArchiveError> {
        // Four-digit years only; anything else breaks fixed-width ordering
        if !(0..=9999).contains(&year) {
            return Err(ArchiveError::InvalidYear(year));
        }

        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(ArchiveError::InvalidYear(year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .ok_or(ArchiveError::InvalidYear(year))?;

        Ok(Self {
            from: Some(start.format(TIMESTAMP_FORMAT).to_string()),
            to: Some(end.format(TIMESTAMP_FORMAT).to_string()),
            ..Self::all(site)
        })
    }
}

/// Result of retrieving one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The capture's stored robots.txt text
    Content(String),

    /// No usable content (non-OK status, transport or body error)
    Unavailable {
        /// Error description, for logs only
        reason: String,
    },
}

/// Lists archived captures of a site's robots.txt
pub trait SnapshotIndex {
    /// Returns capture identifiers in ascending chronological order,
    /// successful captures only, consecutive identical captures collapsed
    fn list_captures(
        &self,
        query: &CaptureQuery,
    ) -> impl Future<Output = Result<Vec<SnapshotId>, ArchiveError>> + Send;
}

/// Retrieves the stored content of one capture
pub trait SnapshotSource {
    /// Fetches `site`'s robots.txt as captured at `id`
    ///
    /// Failures are reported as [`FetchOutcome::Unavailable`], never as
    /// errors: a missing capture only thins the history.
    fn fetch_snapshot(
        &self,
        id: &SnapshotId,
        site: &str,
    ) -> impl Future<Output = FetchOutcome> + Send;
}
