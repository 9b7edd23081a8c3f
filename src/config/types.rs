use serde::Deserialize;

/// Default Wayback CDX search endpoint
pub const DEFAULT_INDEX_URL: &str = "https://web.archive.org/cdx/search/cdx";

/// Default Wayback capture prefix
pub const DEFAULT_CONTENT_URL: &str = "https://web.archive.org/web";

/// Main configuration structure for robots-history
///
/// Every section is optional; a missing file or section falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Archive endpoints and fetch behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// CDX search endpoint
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Prefix that capture URLs are built from
    #[serde(rename = "content-url")]
    pub content_url: String,

    /// Number of concurrent capture fetches
    pub workers: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            content_url: DEFAULT_CONTENT_URL.to_string(),
            workers: 10,
            timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    pub name: String,

    /// Version of the client
    pub version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Which captures to fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Maximum number of captures, -1 for unlimited
    pub limit: i64,

    /// Take the most recent captures instead of spreading over the history
    pub recent: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            recent: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for JSON and raw capture files; stdout when unset
    pub directory: Option<String>,
}
