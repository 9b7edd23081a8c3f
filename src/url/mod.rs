//! URL handling module for robots-history
//!
//! This module cleans user input down to a site root, resolves robots.txt
//! rule values into absolute URLs and extracts hosts for output naming.

mod domain;
mod normalize;

pub use domain::extract_host;
pub use normalize::{resolve_rule_path, site_root};

/// Builds the robots.txt URL for a site root
///
/// # Examples
///
/// ```
/// use robots_history::url::robots_url;
///
/// assert_eq!(robots_url("https://example.com"), "https://example.com/robots.txt");
/// assert_eq!(robots_url("https://example.com/"), "https://example.com/robots.txt");
/// ```
pub fn robots_url(site: &str) -> String {
    format!("{}/robots.txt", site.trim_end_matches('/'))
}
