use crate::config::types::{
    Config, CrawlerConfig, FetchConfig, OutputConfig, UserAgentConfig, ValidationConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_validation_config(&config.validation)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.page_ceiling < 1 {
        return Err(ConfigError::Validation(
            "page-ceiling must be >= 1".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_pagination_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pagination-pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates timeouts and the retry policy
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if !(1..=10).contains(&config.max_attempts) {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.initial_backoff_ms > config.max_backoff_ms {
        return Err(ConfigError::Validation(format!(
            "initial-backoff-ms ({}) must not exceed max-backoff-ms ({})",
            config.initial_backoff_ms, config.max_backoff_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates quality thresholds
fn validate_validation_config(config: &ValidationConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.min_pass_ratio) {
        return Err(ConfigError::Validation(format!(
            "min-pass-ratio must be between 0 and 1, got {}",
            config.min_pass_ratio
        )));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
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
    fn test_zero_max_pages_rejected() {
        let mut config = Config::default();
        config.crawler.max_pages = Some(0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_backoff_order() {
        let mut config = Config::default();
        config.fetch.initial_backoff_ms = 10_000;
        config.fetch.max_backoff_ms = 100;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "bad name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "good_name-2".to_string();
        assert!(validate(&config).is_ok());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = Some("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_pass_ratio_bounds() {
        let mut config = Config::default();
        config.validation.min_pass_ratio = 1.5;
        assert!(validate(&config).is_err());
        config.validation.min_pass_ratio = 0.0;
        assert!(validate(&config).is_ok());
    }
}
