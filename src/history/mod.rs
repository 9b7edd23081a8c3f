//! History reconstruction for one or many sites
//!
//! This module contains the per-site workflow:
//! - Selecting which archived captures to fetch
//! - Fetching and parsing them with a bounded worker pool
//! - Reducing them to a flat path list or a change timeline
//! - Handing the result to an output sink, one site at a time

mod pipeline;
mod progress;
mod selector;

pub use pipeline::{fetch_snapshots, PipelineOptions, DEFAULT_WORKERS};
pub use progress::{LogProgress, NoProgress, ProgressSink};
pub use selector::{sample_evenly, sample_indices, select_versions, Limit, SelectionPolicy};

use crate::archive::{SnapshotIndex, SnapshotSource, WaybackClient};
use crate::config::Config;
use crate::output::ResultSink;
use crate::robots::{collect_rule_urls, SnapshotContent};
use crate::timeline::Timeline;
use crate::url::site_root;
use crate::{HistoryError, UrlError};
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

/// What to produce for each site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every rule URL ever seen, as one sorted set
    Paths,

    /// Ordered change events between captures
    Timeline,
}

/// Outcome of processing a batch of sites
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Sites whose results reached the sink
    pub processed: usize,

    /// Sites that failed, with the reason
    pub failed: Vec<(String, String)>,
}

/// Per-site orchestration of selection, fetching and reduction
pub struct Coordinator<A> {
    archive: Arc<A>,
    policy: SelectionPolicy,
    options: PipelineOptions,
    progress: Arc<dyn ProgressSink>,
}

impl Coordinator<WaybackClient> {
    /// Creates a coordinator talking to the archive named in the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    /// * `policy` - How captures are selected for each site
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to process sites
    /// * `Err(HistoryError)` - The HTTP client could not be built
    pub fn from_config(config: &Config, policy: SelectionPolicy) -> Result<Self, HistoryError> {
        let client = WaybackClient::from_config(&config.archive, &config.user_agent)?;
        let options = PipelineOptions {
            workers: config.archive.workers as usize,
            keep_raw: config.output.directory.is_some(),
        };
        Ok(Self::new(client, policy, options))
    }
}

impl<A> Coordinator<A>
where
    A: SnapshotIndex + SnapshotSource + Send + Sync + 'static,
{
    pub fn new(archive: A, policy: SelectionPolicy, options: PipelineOptions) -> Self {
        Self {
            archive: Arc::new(archive),
            policy,
            options,
            progress: Arc::new(LogProgress::default()),
        }
    }

    /// Replaces the progress sink (log-based by default)
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Selects, fetches and parses the captures of one site
    ///
    /// # Arguments
    ///
    /// * `site` - Site root as returned by [`site_root`]
    /// * `keep_raw` - Keep raw robots.txt text for archival output
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SnapshotContent>)` - Parsed captures, unordered
    /// * `Err(HistoryError)` - The index lookup failed
    pub async fn fetch_history(
        &self,
        site: &str,
        keep_raw: bool,
    ) -> Result<Vec<SnapshotContent>, HistoryError> {
        let ids = select_versions(self.archive.as_ref(), site, &self.policy)
            .await
            .map_err(|source| HistoryError::IndexLookup {
                site: site.to_string(),
                source,
            })?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.progress.start(site, ids.len());
        let options = PipelineOptions {
            keep_raw,
            ..self.options
        };

        fetch_snapshots(
            Arc::clone(&self.archive),
            site,
            ids,
            options,
            Arc::clone(&self.progress),
        )
        .await
        .map_err(|e| HistoryError::Url(UrlError::Parse(format!("{}: {}", site, e))))
    }

    /// Every rule URL that appeared in any selected capture
    ///
    /// Read from the raw text of each capture, so rules outside any agent
    /// group are included and empty values are not.
    pub async fn collect_paths(&self, site: &str) -> Result<BTreeSet<String>, HistoryError> {
        let base = Url::parse(site)
            .map_err(|e| HistoryError::Url(UrlError::Parse(format!("{}: {}", site, e))))?;
        let snapshots = self.fetch_history(site, true).await?;
        Ok(collect_rule_urls(&snapshots, &base))
    }

    /// The change timeline over the selected captures
    pub async fn build_timeline(&self, site: &str) -> Result<Timeline, HistoryError> {
        let snapshots = self.fetch_history(site, self.options.keep_raw).await?;
        Ok(Timeline::from_snapshots(&snapshots, self.policy.year))
    }

    /// Processes one site end to end and hands the result to `sink`
    pub async fn process_site(
        &self,
        site: &str,
        mode: Mode,
        sink: &dyn ResultSink,
    ) -> Result<(), HistoryError> {
        match mode {
            Mode::Paths => {
                let paths = self.collect_paths(site).await?;
                tracing::info!("Found {} distinct rule URLs for {}", paths.len(), site);
                sink.record_paths(site, &paths)?;
            }
            Mode::Timeline => {
                let timeline = self.build_timeline(site).await?;
                if timeline.is_empty() {
                    match self.policy.year {
                        Some(year) => tracing::warn!("No captures found for {} in {}", site, year),
                        None => tracing::warn!("No captures found for {}", site),
                    }
                    return Ok(());
                }
                tracing::info!("Built {} timeline events for {}", timeline.events.len(), site);
                sink.record_timeline(site, &timeline)?;
            }
        }
        Ok(())
    }

    /// Processes every input independently
    ///
    /// Inputs are cleaned to site roots first; unusable inputs and failing
    /// sites are logged and recorded in the summary without stopping the
    /// batch.
    pub async fn run<I, S>(&self, inputs: I, mode: Mode, sink: &dyn ResultSink) -> RunSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = RunSummary::default();

        for input in inputs {
            let input = input.as_ref();
            if input.trim().is_empty() {
                continue;
            }

            let site = match site_root(input) {
                Ok(site) => site,
                Err(e) => {
                    tracing::warn!("Skipping input '{}': {}", input, e);
                    summary.failed.push((input.to_string(), e.to_string()));
                    continue;
                }
            };

            match self.process_site(&site, mode, sink).await {
                Ok(()) => summary.processed += 1,
                Err(e) => {
                    tracing::error!("Failed to process {}: {}", site, e);
                    summary.failed.push((site, e.to_string()));
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveError, CaptureQuery, FetchOutcome, SnapshotId};
    use crate::output::OutputResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory archive keyed by site
    #[derive(Default)]
    struct MemoryArchive {
        sites: HashMap<String, Vec<(String, String)>>,
        failing: Vec<String>,
    }

    impl MemoryArchive {
        fn with_site(mut self, site: &str, captures: &[(&str, &str)]) -> Self {
            self.sites.insert(
                site.to_string(),
                captures
                    .iter()
                    .map(|(id, body)| (id.to_string(), body.to_string()))
                    .collect(),
            );
            self
        }

        fn with_failing(mut self, site: &str) -> Self {
            self.failing.push(site.to_string());
            self
        }
    }

    impl SnapshotIndex for MemoryArchive {
        async fn list_captures(
            &self,
            query: &CaptureQuery,
        ) -> Result<Vec<SnapshotId>, ArchiveError> {
            if self.failing.contains(&query.site) {
                return Err(ArchiveError::Status {
                    url: query.site.clone(),
                    status: 503,
                });
            }
            Ok(self
                .sites
                .get(&query.site)
                .map(|captures| captures.iter().map(|(id, _)| SnapshotId::new(id.clone())).collect())
                .unwrap_or_default())
        }
    }

    impl SnapshotSource for MemoryArchive {
        async fn fetch_snapshot(&self, id: &SnapshotId, site: &str) -> FetchOutcome {
            self.sites
                .get(site)
                .and_then(|captures| captures.iter().find(|(cid, _)| cid == id.as_str()))
                .map(|(_, body)| FetchOutcome::Content(body.clone()))
                .unwrap_or(FetchOutcome::Unavailable {
                    reason: "missing".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        paths: Mutex<Vec<(String, BTreeSet<String>)>>,
        timelines: Mutex<Vec<(String, Timeline)>>,
    }

    impl ResultSink for RecordingSink {
        fn record_paths(&self, site: &str, paths: &BTreeSet<String>) -> OutputResult<()> {
            self.paths.lock().unwrap().push((site.to_string(), paths.clone()));
            Ok(())
        }

        fn record_timeline(&self, site: &str, timeline: &Timeline) -> OutputResult<()> {
            self.timelines
                .lock()
                .unwrap()
                .push((site.to_string(), timeline.clone()));
            Ok(())
        }
    }

    fn coordinator(archive: MemoryArchive, keep_raw: bool) -> Coordinator<MemoryArchive> {
        Coordinator::new(
            archive,
            SelectionPolicy {
                limit: Limit::Unlimited,
                recent: false,
                year: None,
            },
            PipelineOptions {
                workers: 3,
                keep_raw,
            },
        )
        .with_progress(Arc::new(NoProgress))
    }

    #[tokio::test]
    async fn test_collect_paths_unions_all_captures() {
        let archive = MemoryArchive::default().with_site(
            "https://example.com",
            &[
                ("20200101000000", "User-agent: *\nDisallow: /a\n"),
                ("20210101000000", "User-agent: *\nDisallow: /b\nAllow: /a\n"),
            ],
        );

        let paths = coordinator(archive, false)
            .collect_paths("https://example.com")
            .await
            .unwrap();

        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
        assert_eq!(paths, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[tokio::test]
    async fn test_collect_paths_reads_rules_outside_groups() {
        let archive = MemoryArchive::default().with_site(
            "https://example.com",
            &[(
                "20200101000000",
                "Disallow: /orphan\nUser-agent: *\nDisallow:\nDisallow: /a # note\n",
            )],
        );

        let paths = coordinator(archive, false)
            .collect_paths("https://example.com")
            .await
            .unwrap();

        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
        assert_eq!(paths, vec!["https://example.com/a", "https://example.com/orphan"]);
    }

    #[tokio::test]
    async fn test_build_timeline_orders_and_keeps_raw() {
        let archive = MemoryArchive::default().with_site(
            "https://example.com",
            &[
                ("20210101000000", "User-agent: *\nDisallow: /b\n"),
                ("20200101000000", "User-agent: *\nDisallow: /a\n"),
            ],
        );

        let timeline = coordinator(archive, true)
            .build_timeline("https://example.com")
            .await
            .unwrap();

        assert_eq!(timeline.events.len(), 2);
        assert_eq!(timeline.events[0].snapshot.as_str(), "20200101000000");
        assert!(timeline.events[0].initial);
        assert_eq!(timeline.raw_captures.len(), 2);
    }

    #[tokio::test]
    async fn test_index_failure_is_reported_per_site() {
        let archive = MemoryArchive::default().with_failing("https://down.example");

        let result = coordinator(archive, false)
            .collect_paths("https://down.example")
            .await;

        assert!(matches!(result, Err(HistoryError::IndexLookup { .. })));
    }

    #[tokio::test]
    async fn test_run_continues_after_failures() {
        let archive = MemoryArchive::default()
            .with_failing("https://down.example")
            .with_site(
                "https://up.example",
                &[("20200101000000", "User-agent: *\nDisallow: /x\n")],
            );
        let sink = RecordingSink::default();

        let summary = coordinator(archive, false)
            .run(
                ["down.example", "ftp://bad.example", "", "https://up.example/page"],
                Mode::Timeline,
                &sink,
            )
            .await;

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed.len(), 2);
        let timelines = sink.timelines.lock().unwrap();
        assert_eq!(timelines.len(), 1);
        assert_eq!(timelines[0].0, "https://up.example");
    }

    #[tokio::test]
    async fn test_empty_timeline_is_not_recorded() {
        let archive = MemoryArchive::default().with_site("https://empty.example", &[]);
        let sink = RecordingSink::default();

        let summary = coordinator(archive, false)
            .run(["empty.example"], Mode::Timeline, &sink)
            .await;

        assert_eq!(summary.processed, 1);
        assert!(sink.timelines.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paths_mode_records_even_when_empty() {
        let archive = MemoryArchive::default().with_site("https://empty.example", &[]);
        let sink = RecordingSink::default();

        coordinator(archive, false)
            .run(["empty.example"], Mode::Paths, &sink)
            .await;

        let paths = sink.paths.lock().unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].1.is_empty());
    }
}
