//! Rule-set differ
//!
//! Compares one agent's rules between two captures. A path whose directive
//! flipped is reported as removed under the old directive and added under the
//! new one; there is no separate "changed" category.

use crate::robots::{split_by_directive, Directive, RuleSet};

/// Path-level changes for one agent between two captures
///
/// All four lists are sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDiff {
    pub added_allow: Vec<String>,
    pub removed_allow: Vec<String>,
    pub added_disallow: Vec<String>,
    pub removed_disallow: Vec<String>,
}

impl RuleDiff {
    /// Every rule of `rules` as an addition, for agents seen for the first time
    pub fn initial(rules: &RuleSet) -> Self {
        let (added_allow, added_disallow) = split_by_directive(rules);
        Self {
            added_allow,
            added_disallow,
            ..Self::default()
        }
    }

    /// Returns true when nothing was added or removed
    pub fn is_empty(&self) -> bool {
        self.added_allow.is_empty()
            && self.removed_allow.is_empty()
            && self.added_disallow.is_empty()
            && self.removed_disallow.is_empty()
    }

    /// Swaps additions and removals
    ///
    /// `diff_rule_sets(a, b).inverted() == diff_rule_sets(b, a)`.
    pub fn inverted(&self) -> Self {
        Self {
            added_allow: self.removed_allow.clone(),
            removed_allow: self.added_allow.clone(),
            added_disallow: self.removed_disallow.clone(),
            removed_disallow: self.added_disallow.clone(),
        }
    }

    fn record_added(&mut self, path: &str, directive: Directive) {
        match directive {
            Directive::Allow => self.added_allow.push(path.to_string()),
            Directive::Disallow => self.added_disallow.push(path.to_string()),
        }
    }

    fn record_removed(&mut self, path: &str, directive: Directive) {
        match directive {
            Directive::Allow => self.removed_allow.push(path.to_string()),
            Directive::Disallow => self.removed_disallow.push(path.to_string()),
        }
    }

    fn sort(&mut self) {
        self.added_allow.sort();
        self.removed_allow.sort();
        self.added_disallow.sort();
        self.removed_disallow.sort();
    }
}

/// Computes the changes from `previous` to `current` for one agent
///
/// # Examples
///
/// ```
/// use robots_history::robots::{Directive, RuleSet};
/// use robots_history::timeline::diff_rule_sets;
///
/// let previous = RuleSet::from([("/x".to_string(), Directive::Disallow)]);
/// let current = RuleSet::from([("/x".to_string(), Directive::Allow)]);
///
/// let diff = diff_rule_sets(&current, &previous);
/// assert_eq!(diff.added_allow, vec!["/x"]);
/// assert_eq!(diff.removed_disallow, vec!["/x"]);
/// ```
pub fn diff_rule_sets(current: &RuleSet, previous: &RuleSet) -> RuleDiff {
    let mut diff = RuleDiff::default();

    for (path, &directive) in current {
        match previous.get(path) {
            None => diff.record_added(path, directive),
            Some(&old) if old != directive => {
                diff.record_added(path, directive);
                diff.record_removed(path, old);
            }
            Some(_) => {}
        }
    }

    for (path, &old) in previous {
        if !current.contains_key(path) {
            diff.record_removed(path, old);
        }
    }

    diff.sort();
    diff
}
