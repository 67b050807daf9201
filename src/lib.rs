//! QA-Harvest: a single-site crawler for language-model training data
//!
//! This crate crawls one website from a seed URL, follows its pagination,
//! extracts question/answer pairs and discussion threads from page content,
//! removes duplicates, checkpoints accepted records as it goes and finally
//! writes them as JSON lines, CSV or plain text together with a quality report.

pub mod config;
pub mod crawler;
pub mod dedup;
pub mod extract;
pub mod output;
pub mod robots;
pub mod state;
pub mod storage;
pub mod url;
pub mod validate;

use thiserror::Error;

/// Main error type for QA-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Seed URL {url} is unreachable: {reason}")]
    SeedUnreachable { url: String, reason: String },

    #[error("Output destination {path} is not writable: {source}")]
    OutputUnwritable {
        path: String,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] storage::CheckpointError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

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

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for QA-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlOutcome};
pub use extract::{DiscussionRecord, QARecord};
pub use output::OutputFormat;
pub use state::{CrawlState, CrawlTarget, PageState};
pub use validate::ValidationReport;
