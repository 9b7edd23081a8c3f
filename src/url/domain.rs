use url::Url;

/// Extracts the host (with port, if any) from a site URL
///
/// Used to name per-host output directories. Falls back to the input itself
/// when it does not parse or has no host, so callers always get a usable
/// label.
///
/// # Examples
///
/// ```
/// use robots_history::url::extract_host;
///
/// assert_eq!(extract_host("https://example.com"), "example.com");
/// assert_eq!(extract_host("http://127.0.0.1:9000"), "127.0.0.1:9000");
/// assert_eq!(extract_host("not a url"), "not a url");
/// ```
pub fn extract_host(site: &str) -> String {
    let Ok(url) = Url::parse(site) else {
        return site.to_string();
    };

    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => site.to_string(),
    }
}
