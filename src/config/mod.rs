//! Configuration module for QA-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use qa_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will stop after {} pages at most", config.crawler.page_ceiling);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractionConfig, FetchConfig, OutputConfig, UserAgentConfig,
    ValidationConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
