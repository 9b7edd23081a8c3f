//! JSON directory output
//!
//! Writes one directory per host under a root directory:
//! - `paths.json` with the sorted rule URLs in flat mode
//! - `timeline.json` (or `<year>/timeline_<year>.json`) in timeline mode
//! - `robots_<timestamp>.txt` for every capture that produced an event

use crate::output::traits::{OutputResult, ResultSink};
use crate::timeline::{AgentChange, ChangeEvent, Timeline};
use crate::url::extract_host;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Added and removed paths for one directive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

impl ChangeSet {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Rule changes for one user-agent, split by directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleChange {
    pub user_agent: String,

    #[serde(skip_serializing_if = "ChangeSet::is_empty")]
    pub allow: ChangeSet,

    #[serde(skip_serializing_if = "ChangeSet::is_empty")]
    pub disallow: ChangeSet,
}

impl From<&AgentChange> for RuleChange {
    fn from(change: &AgentChange) -> Self {
        Self {
            user_agent: change.user_agent.clone(),
            allow: ChangeSet {
                added: change.diff.added_allow.clone(),
                removed: change.diff.removed_allow.clone(),
            },
            disallow: ChangeSet {
                added: change.diff.added_disallow.clone(),
                removed: change.diff.removed_disallow.clone(),
            },
        }
    }
}

/// One entry of `timeline.json`
///
/// New agents are listed by name in `agents_added` and their rules appear in
/// `rule_changes` as additions. The first capture only fills
/// `initial_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub timestamp: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub agents_added: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub agents_removed: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rule_changes: Vec<RuleChange>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initial_content: Vec<RuleChange>,
}

impl From<&ChangeEvent> for TimelineEntry {
    fn from(event: &ChangeEvent) -> Self {
        let timestamp = event.snapshot.to_string();

        if event.initial {
            return Self {
                timestamp,
                agents_added: Vec::new(),
                agents_removed: Vec::new(),
                rule_changes: Vec::new(),
                initial_content: event.agents_added.iter().map(RuleChange::from).collect(),
            };
        }

        Self {
            timestamp,
            agents_added: event
                .agents_added
                .iter()
                .map(|change| change.user_agent.clone())
                .collect(),
            agents_removed: event.agents_removed.clone(),
            rule_changes: event
                .agents_added
                .iter()
                .chain(&event.rule_changes)
                .map(RuleChange::from)
                .collect(),
            initial_content: Vec::new(),
        }
    }
}

/// Converts a timeline into its JSON entries
pub fn timeline_entries(timeline: &Timeline) -> Vec<TimelineEntry> {
    timeline.events.iter().map(TimelineEntry::from).collect()
}

/// Writes results as files under a root directory
#[derive(Debug, Clone)]
pub struct JsonDirectorySink {
    root: PathBuf,
}

impl JsonDirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn host_dir(&self, site: &str) -> PathBuf {
        self.root.join(extract_host(site))
    }

    fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }
}

impl ResultSink for JsonDirectorySink {
    fn record_paths(&self, site: &str, paths: &BTreeSet<String>) -> OutputResult<()> {
        let dir = self.host_dir(site);
        fs::create_dir_all(&dir)?;

        let file = dir.join("paths.json");
        Self::write_json(&file, paths)?;
        tracing::info!("Wrote {} paths to {}", paths.len(), file.display());
        Ok(())
    }

    fn record_timeline(&self, site: &str, timeline: &Timeline) -> OutputResult<()> {
        let (dir, file_name) = match timeline.year {
            Some(year) => (
                self.host_dir(site).join(year.to_string()),
                format!("timeline_{}.json", year),
            ),
            None => (self.host_dir(site), "timeline.json".to_string()),
        };
        fs::create_dir_all(&dir)?;

        for (id, raw) in &timeline.raw_captures {
            fs::write(dir.join(format!("robots_{}.txt", id)), raw)?;
        }
        if !timeline.raw_captures.is_empty() {
            tracing::info!(
                "Wrote {} raw robots.txt files to {}",
                timeline.raw_captures.len(),
                dir.display()
            );
        }

        let file = dir.join(file_name);
        Self::write_json(&file, &timeline_entries(timeline))?;
        tracing::info!("Wrote timeline to {}", file.display());
        Ok(())
    }
}
