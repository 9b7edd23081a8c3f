use crate::UrlError;
use url::Url;

/// Schemes accepted for a site root
const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Cleans a user-supplied host or URL down to its site root
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Keep an explicit `http://` or `https://` scheme, default to `https`
/// 3. Reject any other explicit scheme
/// 4. Parse and keep only `scheme://host[:port]` (host lowercased by the parser)
///
/// Paths, queries and fragments in the input are discarded, so
/// `example.com/some/page?x=1` and `https://EXAMPLE.com/` both clean to
/// `https://example.com`.
///
/// # Examples
///
/// ```
/// use robots_history::url::site_root;
///
/// assert_eq!(site_root("Example.com/about").unwrap(), "https://example.com");
/// assert_eq!(site_root("http://example.com:8080/x").unwrap(), "http://example.com:8080");
/// ```
pub fn site_root(input: &str) -> Result<String, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty host".to_string()));
    }

    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let scheme = scheme.to_ascii_lowercase();
            if !SUPPORTED_SCHEMES.contains(&scheme.as_str()) {
                return Err(UrlError::InvalidScheme(scheme));
            }
            (scheme, rest)
        }
        None => ("https".to_string(), trimmed),
    };

    let parsed = Url::parse(&format!("{}://{}", scheme, rest))
        .map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| UrlError::MissingHost(trimmed.to_string()))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", scheme, host, port),
        None => format!("{}://{}", scheme, host),
    })
}

/// Resolves an Allow/Disallow value into an absolute URL under `base`
///
/// A leading slash is enforced first, then the value is resolved as a URL
/// reference against the site root. The same value always resolves to the
/// same string for the same base, which is what lets rule sets from
/// different captures be compared by equality.
///
/// # Examples
///
/// ```
/// use robots_history::url::resolve_rule_path;
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// assert_eq!(resolve_rule_path(&base, "private/").unwrap(), "https://example.com/private/");
/// assert_eq!(resolve_rule_path(&base, "/search?q=*").unwrap(), "https://example.com/search?q=*");
/// ```
pub fn resolve_rule_path(base: &Url, value: &str) -> Result<String, UrlError> {
    let path = if value.starts_with('/') {
        value.to_string()
    } else {
        format!("/{}", value)
    };

    base.join(&path)
        .map(|resolved| resolved.to_string())
        .map_err(|e| UrlError::Parse(format!("{}: {}", value, e)))
}
