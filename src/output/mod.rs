//! Output module for per-site results
//!
//! This module handles:
//! - Printing flat path lists and change logs as text
//! - Writing JSON files and raw captures into per-host directories

mod json;
mod text;
mod traits;

pub use json::{timeline_entries, ChangeSet, JsonDirectorySink, RuleChange, TimelineEntry};
pub use text::{format_timeline, StdoutSink, TextSink};
pub use traits::{OutputError, OutputResult, ResultSink};
