//! Version selector
//!
//! This module decides which captures of a site's robots.txt to fetch:
//! - Building the index query for the selection policy
//! - Passing through everything in recent, unlimited and year modes
//! - Spreading a bounded selection evenly over the whole history

use crate::archive::{ArchiveError, CaptureQuery, SnapshotId, SnapshotIndex};

/// Maximum number of captures to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Unlimited,
    Max(usize),
}

impl Limit {
    /// Converts the command-line convention (-1 means unlimited)
    ///
    /// # Examples
    ///
    /// ```
    /// use robots_history::Limit;
    ///
    /// assert_eq!(Limit::from_flag(-1), Limit::Unlimited);
    /// assert_eq!(Limit::from_flag(25), Limit::Max(25));
    /// ```
    pub fn from_flag(value: i64) -> Self {
        match usize::try_from(value) {
            Ok(max) => Self::Max(max),
            Err(_) => Self::Unlimited,
        }
    }
}

/// How captures are chosen for one site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Maximum number of captures
    pub limit: Limit,

    /// Use the most recent captures rather than sampling the whole history
    pub recent: bool,

    /// Restrict to one calendar year; overrides `limit` and `recent`
    pub year: Option<i32>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            limit: Limit::Max(100),
            recent: true,
            year: None,
        }
    }
}

impl SelectionPolicy {
    /// Builds the index query for `site` under this policy
    pub fn query(&self, site: &str) -> Result<CaptureQuery, ArchiveError> {
        if let Some(year) = self.year {
            return CaptureQuery::for_year(site, year);
        }

        Ok(match (self.recent, self.limit) {
            (true, Limit::Max(count)) => CaptureQuery::most_recent(site, count),
            _ => CaptureQuery::all(site),
        })
    }

    /// Applies the policy to the captures the index returned
    pub fn apply(&self, captures: Vec<SnapshotId>) -> Vec<SnapshotId> {
        if self.year.is_some() || self.recent {
            return captures;
        }

        match self.limit {
            Limit::Max(limit) if captures.len() > limit => sample_evenly(&captures, limit),
            _ => captures,
        }
    }
}

/// Picks `limit` indices spread evenly over `0..len`
///
/// Index `i` is `i * len / (limit - 1)` truncated, clamped to `len - 1`; the
/// last pick is always `len - 1` so the newest capture is included. Because
/// the step is greater than one whenever `len > limit`, the picks are
/// strictly increasing.
///
/// # Examples
///
/// ```
/// use robots_history::history::sample_indices;
///
/// assert_eq!(sample_indices(10, 4), vec![0, 3, 6, 9]);
/// assert_eq!(sample_indices(10, 1), vec![9]);
/// ```
pub fn sample_indices(len: usize, limit: usize) -> Vec<usize> {
    if len == 0 || limit == 0 {
        return Vec::new();
    }

    let last = len - 1;
    (0..limit)
        .map(|i| {
            if i == limit - 1 {
                return last;
            }
            let interval = len as f64 / (limit - 1) as f64;
            ((i as f64 * interval) as usize).min(last)
        })
        .collect()
}

/// Evenly samples `limit` items, always keeping the first and the last
pub fn sample_evenly<T: Clone>(items: &[T], limit: usize) -> Vec<T> {
    sample_indices(items.len(), limit)
        .into_iter()
        .map(|index| items[index].clone())
        .collect()
}

/// Selects the captures to fetch for `site`
///
/// # Returns
///
/// * `Ok(Vec<SnapshotId>)` - Chosen captures, oldest first (may be empty)
/// * `Err(ArchiveError)` - The index lookup failed
pub async fn select_versions<I>(
    index: &I,
    site: &str,
    policy: &SelectionPolicy,
) -> Result<Vec<SnapshotId>, ArchiveError>
where
    I: SnapshotIndex,
{
    let query = policy.query(site)?;
    let captures = index.list_captures(&query).await?;
    let available = captures.len();

    let selected = policy.apply(captures);
    tracing::info!(
        "Selected {} of {} captures for {}",
        selected.len(),
        available,
        site
    );

    Ok(selected)
}
