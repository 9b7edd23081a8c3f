//! Robots.txt handling module
//!
//! This module parses robots.txt documents into per-agent rule sets and
//! provides the rule types shared by the pipeline and the timeline.

mod parser;
mod rules;

pub use parser::{parse_robots, scan_rule_urls};
pub use rules::{split_by_directive, AgentRules, Directive, RuleSet, SnapshotContent};

use std::collections::BTreeSet;
use url::Url;

/// Collects every rule URL seen in any snapshot, for any agent
///
/// This is the flat (non-timeline) view of a site's history: the set of all
/// paths that were ever allowed or disallowed, sorted and deduplicated. It is
/// read from each snapshot's raw text with [`scan_rule_urls`], so rules
/// outside any agent group count too; snapshots fetched without raw text
/// contribute nothing.
pub fn collect_rule_urls<'a, I>(snapshots: I, base: &Url) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a SnapshotContent>,
{
    snapshots
        .into_iter()
        .filter_map(|snapshot| snapshot.raw.as_deref())
        .flat_map(|raw| scan_rule_urls(raw, base))
        .collect()
}

/// Renders rule sets back into robots.txt text
///
/// Each agent gets its own group. Rule URLs are written as their path and
/// query, so parsing the output against the same site root reproduces the
/// input rules.
pub fn render_robots(rules: &AgentRules) -> String {
    let mut out = String::new();

    for (agent, rule_set) in rules {
        out.push_str(&format!("User-agent: {}\n", agent));
        for (rule_url, directive) in rule_set {
            let value = match Url::parse(rule_url) {
                Ok(url) => match url.query() {
                    Some(query) => format!("{}?{}", url.path(), query),
                    None => url.path().to_string(),
                },
                Err(_) => rule_url.clone(),
            };
            let name = match directive {
                Directive::Allow => "Allow",
                Directive::Disallow => "Disallow",
            };
            out.push_str(&format!("{}: {}\n", name, value));
        }
        out.push('\n');
    }

    out
}
