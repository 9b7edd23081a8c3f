//! Wayback Machine client
//!
//! This module handles all HTTP requests to the archive, including:
//! - Building the HTTP client with a proper user agent string
//! - Querying the CDX index for robots.txt captures
//! - Retrieving the raw text of individual captures

use crate::archive::{
    ArchiveError, CaptureQuery, FetchOutcome, SnapshotId, SnapshotIndex, SnapshotSource,
};
use crate::config::{ArchiveConfig, UserAgentConfig};
use crate::url::robots_url;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout_secs` - Per-request timeout; a stalled capture only holds its
///   worker this long
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use robots_history::archive::build_http_client;
/// use robots_history::config::UserAgentConfig;
///
/// let client = build_http_client(&UserAgentConfig::default(), 30).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version (+ContactURL)
    let agent = match &user_agent.contact_url {
        Some(contact) => format!("{}/{} (+{})", user_agent.name, user_agent.version, contact),
        None => format!("{}/{}", user_agent.name, user_agent.version),
    };

    Client::builder()
        .user_agent(agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        // The archive redirects to the nearest capture when the exact one is missing
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Decodes a CDX JSON response into capture identifiers
///
/// The response is an array of rows whose first row is the field header.
/// An empty body or an empty array both mean "no captures".
///
/// # Examples
///
/// ```
/// use robots_history::archive::parse_capture_rows;
///
/// let ids = parse_capture_rows(r#"[["timestamp"],["20200101000000"],["20210101000000"]]"#).unwrap();
/// assert_eq!(ids.len(), 2);
/// assert!(parse_capture_rows("[]").unwrap().is_empty());
/// ```
pub fn parse_capture_rows(body: &str) -> Result<Vec<SnapshotId>, ArchiveError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<String>> = serde_json::from_str(body)?;

    Ok(rows
        .into_iter()
        .skip(1) // header row
        .filter_map(|row| row.into_iter().next())
        .map(SnapshotId::new)
        .collect())
}

/// HTTP client for the Wayback Machine CDX index and capture store
#[derive(Debug, Clone)]
pub struct WaybackClient {
    client: Client,
    index_url: String,
    content_url: String,
}

impl WaybackClient {
    /// Creates a client against explicit endpoints
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `index_url` - CDX search endpoint, e.g. `https://web.archive.org/cdx/search/cdx`
    /// * `content_url` - Capture prefix, e.g. `https://web.archive.org/web`
    pub fn new(client: Client, index_url: impl Into<String>, content_url: impl Into<String>) -> Self {
        Self {
            client,
            index_url: index_url.into(),
            content_url: content_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from the archive and user agent configuration
    pub fn from_config(
        archive: &ArchiveConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, archive.timeout_secs)?;
        Ok(Self::new(client, &archive.index_url, &archive.content_url))
    }

    /// URL of the raw stored text of one capture
    ///
    /// The `if_` suffix asks the archive for the capture without its
    /// navigation frame.
    pub fn capture_url(&self, id: &SnapshotId, site: &str) -> String {
        format!("{}/{}if_/{}", self.content_url, id, robots_url(site))
    }

    fn index_params(query: &CaptureQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("url", robots_url(&query.site)),
            ("output", "json".to_string()),
            ("fl", "timestamp".to_string()),
            ("filter", "statuscode:200".to_string()),
            ("collapse", "digest".to_string()),
        ];

        if let Some(from) = &query.from {
            params.push(("from", from.clone()));
        }
        if let Some(to) = &query.to {
            params.push(("to", to.clone()));
        }
        if let Some(count) = query.most_recent {
            // A negative limit makes the index return the last N rows
            params.push(("limit", format!("-{}", count)));
        }

        params
    }
}

impl SnapshotIndex for WaybackClient {
    async fn list_captures(&self, query: &CaptureQuery) -> Result<Vec<SnapshotId>, ArchiveError> {
        let params = Self::index_params(query);
        tracing::debug!("Querying capture index for {}", robots_url(&query.site));

        let response = self
            .client
            .get(&self.index_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_capture_rows(&body)
    }
}

impl SnapshotSource for WaybackClient {
    async fn fetch_snapshot(&self, id: &SnapshotId, site: &str) -> FetchOutcome {
        let url = self.capture_url(id, site);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                // Classify error
                let reason = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                return FetchOutcome::Unavailable { reason };
            }
        };

        if response.status() != StatusCode::OK {
            return FetchOutcome::Unavailable {
                reason: format!("HTTP {}", response.status().as_u16()),
            };
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Content(body),
            Err(e) => FetchOutcome::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}
