//! Timeline builder
//!
//! Folds chronologically ordered snapshots into change events. The fold is
//! strictly sequential: every snapshot is compared with the one right before
//! it, whether or not that one produced an event.

use crate::archive::SnapshotId;
use crate::robots::{AgentRules, SnapshotContent};
use crate::timeline::diff::{diff_rule_sets, RuleDiff};
use std::collections::BTreeMap;

/// Rule changes for one user-agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentChange {
    pub user_agent: String,
    pub diff: RuleDiff,
}

/// What changed in one capture relative to the previous one
///
/// Agent lists are sorted by agent name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Capture this event describes
    pub snapshot: SnapshotId,

    /// True for the first capture of the timeline
    pub initial: bool,

    /// Agents not present in the previous capture, with all their rules as
    /// additions (every agent, for the initial event)
    pub agents_added: Vec<AgentChange>,

    /// Agents present in the previous capture but gone from this one
    pub agents_removed: Vec<String>,

    /// Agents present in both captures whose rules changed
    pub rule_changes: Vec<AgentChange>,
}

impl ChangeEvent {
    /// The event for the first capture: every agent is new
    fn initial(snapshot: &SnapshotContent) -> Self {
        Self {
            snapshot: snapshot.id.clone(),
            initial: true,
            agents_added: added_agents(&snapshot.rules, None),
            agents_removed: Vec::new(),
            rule_changes: Vec::new(),
        }
    }

    /// The event between two consecutive captures, if anything changed
    fn between(previous: &AgentRules, snapshot: &SnapshotContent) -> Option<Self> {
        let current = &snapshot.rules;

        let agents_added = added_agents(current, Some(previous));

        let agents_removed: Vec<String> = previous
            .keys()
            .filter(|agent| !current.contains_key(*agent))
            .cloned()
            .collect();

        let rule_changes: Vec<AgentChange> = current
            .iter()
            .filter_map(|(agent, rules)| {
                let old = previous.get(agent)?;
                let diff = diff_rule_sets(rules, old);
                (!diff.is_empty()).then(|| AgentChange {
                    user_agent: agent.clone(),
                    diff,
                })
            })
            .collect();

        let event = Self {
            snapshot: snapshot.id.clone(),
            initial: false,
            agents_added,
            agents_removed,
            rule_changes,
        };

        event.has_changes().then_some(event)
    }

    /// Returns true if any agent was added, removed or changed
    pub fn has_changes(&self) -> bool {
        !self.agents_added.is_empty()
            || !self.agents_removed.is_empty()
            || !self.rule_changes.is_empty()
    }
}

fn added_agents(current: &AgentRules, previous: Option<&AgentRules>) -> Vec<AgentChange> {
    current
        .iter()
        .filter(|(agent, _)| previous.map_or(true, |prev| !prev.contains_key(*agent)))
        .map(|(agent, rules)| AgentChange {
            user_agent: agent.clone(),
            diff: RuleDiff::initial(rules),
        })
        .collect()
}

/// Builds the change timeline for a set of snapshots
///
/// Snapshots are ordered by [`SnapshotId`] first, so callers may pass the
/// pipeline's unordered output directly. The first snapshot always yields an
/// initial event; later snapshots yield an event only when something changed.
///
/// A capture that failed to fetch is simply absent here, so the next capture
/// is compared with the last one that did arrive and reports every change
/// made in between.
pub fn build_timeline(snapshots: &[SnapshotContent]) -> Vec<ChangeEvent> {
    let mut ordered: Vec<&SnapshotContent> = snapshots.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut events = Vec::new();
    let mut previous: Option<&AgentRules> = None;

    for snapshot in ordered {
        let event = match previous {
            None => Some(ChangeEvent::initial(snapshot)),
            Some(prev) => ChangeEvent::between(prev, snapshot),
        };

        if let Some(event) = event {
            events.push(event);
        } else {
            tracing::trace!("Capture {} has no rule changes", snapshot.id);
        }

        previous = Some(&snapshot.rules);
    }

    events
}

/// A site's change timeline plus the raw text of the captures it mentions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    /// Ordered change events
    pub events: Vec<ChangeEvent>,

    /// Raw robots.txt text of each capture that produced an event, when
    /// it was kept and non-empty
    pub raw_captures: BTreeMap<SnapshotId, String>,

    /// Calendar year the timeline was restricted to, if any
    pub year: Option<i32>,
}

impl Timeline {
    /// Builds the timeline and collects raw text for the emitted captures
    pub fn from_snapshots(snapshots: &[SnapshotContent], year: Option<i32>) -> Self {
        let events = build_timeline(snapshots);

        let raw_captures = snapshots
            .iter()
            .filter(|snapshot| events.iter().any(|event| event.snapshot == snapshot.id))
            .filter_map(|snapshot| {
                let raw = snapshot.raw.as_ref().filter(|raw| !raw.is_empty())?;
                Some((snapshot.id.clone(), raw.clone()))
            })
            .collect();

        Self {
            events,
            raw_captures,
            year,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
