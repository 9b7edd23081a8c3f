//! Robots.txt parser implementation
//!
//! A single forward pass over the document that groups consecutive
//! `User-agent` lines and records every following Allow/Disallow rule for each
//! agent in the group. Anything the parser cannot use is skipped line by line;
//! a malformed document never fails as a whole.

use crate::robots::rules::{AgentRules, Directive};
use crate::url::resolve_rule_path;
use url::Url;

/// Where the parser stands relative to a block of `User-agent` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupState {
    /// The previous directive was not a `User-agent`; the next one opens a
    /// new group
    AwaitingGroup,

    /// The previous directive was a `User-agent`; the next one joins the
    /// current group
    InGroup,
}

/// A line the parser understood
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    UserAgent(&'a str),
    Rule(Directive, &'a str),
    Other,
}

/// Splits a line into its directive and value, if it has one
fn classify_line(line: &str) -> Option<Line<'_>> {
    let trimmed = line.trim();

    // Skip comments and empty lines
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (key, value) = trimmed.split_once(':')?;
    let key = key.trim();
    let value = value.trim();

    if key.eq_ignore_ascii_case("user-agent") {
        Some(Line::UserAgent(value))
    } else if let Some(directive) = Directive::from_name(key) {
        Some(Line::Rule(directive, value))
    } else {
        Some(Line::Other)
    }
}

/// Parses robots.txt content into per-agent rule sets
///
/// # Grouping
///
/// - Consecutive `User-agent` lines form one group; every agent in the group
///   receives the rules that follow.
/// - A `User-agent` line after any other directive starts a new group.
/// - Allow/Disallow lines before the first `User-agent` are dropped.
/// - Other directives (Sitemap, Crawl-delay, ...) are ignored but still end
///   the run of `User-agent` lines.
///
/// Rule values are resolved against `base` so the same path compares equal
/// across captures. When a path appears twice for one agent the later
/// directive wins.
///
/// # Examples
///
/// ```
/// use robots_history::robots::{parse_robots, Directive};
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// let rules = parse_robots("User-agent: *\nDisallow: /admin\n", &base);
/// assert_eq!(rules["*"]["https://example.com/admin"], Directive::Disallow);
/// ```
pub fn parse_robots(content: &str, base: &Url) -> AgentRules {
    let mut rules = AgentRules::new();
    let mut current_agents: Vec<&str> = Vec::new();
    let mut state = GroupState::AwaitingGroup;

    for line in content.lines() {
        let Some(line) = classify_line(line) else {
            continue;
        };

        match line {
            Line::UserAgent(agent) => {
                if state == GroupState::AwaitingGroup {
                    current_agents.clear();
                }
                current_agents.push(agent);
                state = GroupState::InGroup;
            }
            Line::Rule(directive, value) => {
                state = GroupState::AwaitingGroup;

                if current_agents.is_empty() {
                    tracing::trace!("Skipping {} rule outside any agent group", directive);
                    continue;
                }

                let url = match resolve_rule_path(base, value) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::trace!("Skipping unresolvable {} rule: {}", directive, e);
                        continue;
                    }
                };

                for agent in &current_agents {
                    rules
                        .entry(agent.to_string())
                        .or_default()
                        .insert(url.clone(), directive);
                }
            }
            Line::Other => {
                state = GroupState::AwaitingGroup;
            }
        }
    }

    rules
}

/// Lists the URL of every Allow/Disallow line, ignoring agent groups
///
/// This is the flat reading of a document: rules outside any group count,
/// empty values are skipped, and only the first whitespace-separated token
/// of a value is kept, so trailing `# comments` fall away. Lines appear in
/// document order and may repeat.
///
/// # Examples
///
/// ```
/// use robots_history::robots::scan_rule_urls;
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// let urls = scan_rule_urls("Disallow: /a # old\nUser-agent: *\nAllow:\n", &base);
/// assert_eq!(urls, vec!["https://example.com/a"]);
/// ```
pub fn scan_rule_urls(content: &str, base: &Url) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| match classify_line(line)? {
            Line::Rule(_, value) => value.split_whitespace().next(),
            _ => None,
        })
        .filter_map(|token| match resolve_rule_path(base, token) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::trace!("Skipping unresolvable rule value: {}", e);
                None
            }
        })
        .collect()
}
