//! robots-history: a robots.txt time machine
//!
//! This crate reconstructs how a site's robots.txt evolved by pulling archived
//! captures from a snapshot service, parsing each one into per-agent rule sets,
//! and folding them into a timeline of rule additions and removals.

pub mod archive;
pub mod config;
pub mod history;
pub mod output;
pub mod robots;
pub mod timeline;
pub mod url;

use thiserror::Error;

/// Main error type for robots-history operations
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Snapshot index lookup failed for {site}: {source}")]
    IndexLookup {
        site: String,
        source: archive::ArchiveError,
    },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for robots-history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use archive::{SnapshotId, WaybackClient};
pub use config::Config;
pub use history::{Coordinator, Limit, SelectionPolicy};
pub use robots::{parse_robots, AgentRules, Directive, RuleSet, SnapshotContent};
pub use timeline::{build_timeline, diff_rule_sets, ChangeEvent, RuleDiff, Timeline};
