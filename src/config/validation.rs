use crate::config::types::{ArchiveConfig, Config, SelectionConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Earliest year the archive holds captures for
pub const FIRST_ARCHIVE_YEAR: i32 = 1996;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_archive_config(&config.archive)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_selection_config(&config.selection)?;
    Ok(())
}

/// Validates archive configuration
fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    validate_http_url("index-url", &config.index_url)?;
    validate_http_url("content-url", &config.content_url)?;

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation("name cannot be empty".to_string()));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates selection configuration
fn validate_selection_config(config: &SelectionConfig) -> Result<(), ConfigError> {
    validate_limit(config.limit)
}

/// Validates a capture limit: -1 (unlimited) or a positive count
pub fn validate_limit(limit: i64) -> Result<(), ConfigError> {
    if limit == -1 || limit >= 1 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "limit must be -1 (unlimited) or >= 1, got {}",
            limit
        )))
    }
}

/// Validates a year filter against the archive's lifetime
pub fn validate_year(year: i32) -> Result<(), ConfigError> {
    if (FIRST_ARCHIVE_YEAR..=9999).contains(&year) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "year must be between {} and 9999, got {}",
            FIRST_ARCHIVE_YEAR, year
        )))
    }
}

/// Validates that a configured endpoint is an absolute HTTP(S) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_workers_bounds() {
        let mut config = Config::default();
        config.archive.workers = 0;
        assert!(validate(&config).is_err());

        config.archive.workers = 101;
        assert!(validate(&config).is_err());

        config.archive.workers = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_endpoint_urls() {
        let mut config = Config::default();
        config.archive.index_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        let mut config = Config::default();
        config.archive.content_url = "ftp://archive.example/web".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_user_agent_name() {
        let mut config = Config::default();
        config.user_agent.name = "bad name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.name = String::new();
        assert!(validate(&config).is_err());

        config.user_agent.name = "history_bot-2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(-1).is_ok());
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(500).is_ok());

        assert!(validate_limit(0).is_err());
        assert!(validate_limit(-2).is_err());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_year(1996).is_ok());
        assert!(validate_year(2023).is_ok());

        assert!(validate_year(1995).is_err());
        assert!(validate_year(10000).is_err());
    }
}
