//! Change timeline module
//!
//! This module turns a site's parsed robots.txt captures into an ordered
//! list of change events:
//! - Per-agent rule diffs (added/removed Allow and Disallow paths)
//! - Agents appearing and disappearing between captures
//! - Dropping captures that changed nothing

mod builder;
mod diff;

pub use builder::{build_timeline, AgentChange, ChangeEvent, Timeline};
pub use diff::{diff_rule_sets, RuleDiff};
