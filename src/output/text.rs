//! Human-readable change log
//!
//! Renders results as plain text: one URL per line in flat mode, and a
//! change log with `[+]`, `[-]` and `[~]` markers in timeline mode.

use crate::output::traits::{OutputResult, ResultSink};
use crate::timeline::{AgentChange, ChangeEvent, RuleDiff, Timeline};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes results as text to any writer
pub struct TextSink<W: Write> {
    writer: Mutex<W>,
}

/// Text sink bound to the process's standard output
pub type StdoutSink = TextSink<io::Stdout>;

impl TextSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_str(&self, text: &str) -> OutputResult<()> {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ResultSink for TextSink<W> {
    fn record_paths(&self, _site: &str, paths: &BTreeSet<String>) -> OutputResult<()> {
        let mut text = String::new();
        for path in paths {
            text.push_str(path);
            text.push('\n');
        }
        self.write_str(&text)
    }

    fn record_timeline(&self, _site: &str, timeline: &Timeline) -> OutputResult<()> {
        self.write_str(&format_timeline(timeline))
    }
}

/// Formats every event of a timeline as a change log
pub fn format_timeline(timeline: &Timeline) -> String {
    let mut out = String::new();
    for event in &timeline.events {
        format_event(&mut out, event);
    }
    out
}

fn format_event(out: &mut String, event: &ChangeEvent) {
    let _ = writeln!(out, "\n--- Changes on {} ---", event.snapshot);

    if event.initial {
        out.push_str("Initial version:\n");
        for change in &event.agents_added {
            let _ = writeln!(out, "  User-agent: {}", change.user_agent);
            write_additions(out, &change.diff);
        }
        return;
    }

    for change in &event.agents_added {
        let _ = writeln!(out, "  [+] New User-agent: {}", change.user_agent);
        write_additions(out, &change.diff);
    }
    for agent in &event.agents_removed {
        let _ = writeln!(out, "  [-] Removed User-agent: {}", agent);
    }
    for AgentChange { user_agent, diff } in &event.rule_changes {
        let _ = writeln!(out, "  [~] Changed User-agent: {}", user_agent);
        write_section(out, "Allow", &diff.added_allow, &diff.removed_allow);
        write_section(out, "Disallow", &diff.added_disallow, &diff.removed_disallow);
    }
}

fn write_additions(out: &mut String, diff: &RuleDiff) {
    write_section(out, "Allow", &diff.added_allow, &[]);
    write_section(out, "Disallow", &diff.added_disallow, &[]);
}

fn write_section(out: &mut String, heading: &str, added: &[String], removed: &[String]) {
    if added.is_empty() && removed.is_empty() {
        return;
    }
    let _ = writeln!(out, "    {}:", heading);
    for path in added {
        let _ = writeln!(out, "      + {}", path);
    }
    for path in removed {
        let _ = writeln!(out, "      - {}", path);
    }
}
