//! Configuration module for robots-history
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so the configuration file is optional.
//!
//! # Example
//!
//! ```no_run
//! use robots_history::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("robots-history.toml")).unwrap();
//! println!("Fetching with {} workers", config.archive.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ArchiveConfig, Config, OutputConfig, SelectionConfig, UserAgentConfig, DEFAULT_CONTENT_URL,
    DEFAULT_INDEX_URL,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_limit, validate_year, FIRST_ARCHIVE_YEAR};
