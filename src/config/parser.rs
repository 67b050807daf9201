use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use qa_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Page ceiling: {}", config.crawler.page_ceiling);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-pages = 25
page-ceiling = 100
request-delay-ms = 0
respect-robots-txt = false

[fetch]
timeout-secs = 4
max-attempts = 2

[user-agent]
crawler-name = "faq-harvester"
crawler-version = "1.0"
contact-url = "https://example.com/harvest-bot"

[extraction]
convert-discussions = true

[validation]
min-pass-ratio = 0.5

[output]
directory = "./out"
format = "csv"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, Some(25));
        assert_eq!(config.crawler.page_ceiling, 100);
        assert!(!config.crawler.respect_robots_txt);
        assert_eq!(config.fetch.timeout_secs, 4);
        assert_eq!(config.fetch.max_attempts, 2);
        assert_eq!(config.user_agent.crawler_name, "faq-harvester");
        assert!(config.extraction.convert_discussions);
        assert_eq!(config.validation.min_pass_ratio, 0.5);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.directory, "./out");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.max_pages, None);
        assert_eq!(config.crawler.page_ceiling, 500);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.validation.min_question_chars, 10);
        assert_eq!(config.validation.min_answer_chars, 20);
        assert_eq!(config.output.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = parse_config("[output]\nformat = \"xml\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[fetch]\nmax-attempts = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
