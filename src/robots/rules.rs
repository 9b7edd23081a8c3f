//! Rule types produced by the robots.txt parser

use crate::archive::SnapshotId;
use std::collections::BTreeMap;
use std::fmt;

/// An Allow or Disallow directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Directive {
    Allow,
    Disallow,
}

impl Directive {
    /// Parses a directive name case-insensitively ("Allow", "DISALLOW", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "allow" => Some(Self::Allow),
            "disallow" => Some(Self::Disallow),
            _ => None,
        }
    }

    /// Returns the lowercase directive name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Disallow => "disallow",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved rule URL → directive, for one user-agent in one snapshot
pub type RuleSet = BTreeMap<String, Directive>;

/// User-agent name (as written) → rule set, for one snapshot
pub type AgentRules = BTreeMap<String, RuleSet>;

/// A fetched and parsed snapshot
///
/// Produced once per successful fetch by the pipeline and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotContent {
    /// Capture the rules were taken from
    pub id: SnapshotId,

    /// Parsed rules, rebuilt from scratch for this capture
    pub rules: AgentRules,

    /// Raw robots.txt text, kept only when archival output needs it
    pub raw: Option<String>,
}

impl SnapshotContent {
    /// Creates a snapshot without raw text
    pub fn new(id: SnapshotId, rules: AgentRules) -> Self {
        Self {
            id,
            rules,
            raw: None,
        }
    }

    /// Attaches the raw text the rules were parsed from
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }
}

/// Splits a rule set into sorted (allow, disallow) path lists
pub fn split_by_directive(rules: &RuleSet) -> (Vec<String>, Vec<String>) {
    let mut allows = Vec::new();
    let mut disallows = Vec::new();

    // BTreeMap iteration is already sorted by path
    for (path, directive) in rules {
        match directive {
            Directive::Allow => allows.push(path.clone()),
            Directive::Disallow => disallows.push(path.clone()),
        }
    }

    (allows, disallows)
}
