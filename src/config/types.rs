use crate::output::OutputFormat;
use serde::Deserialize;

/// Main configuration structure for QA-Harvest
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub extraction: ExtractionConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
}

/// Crawl loop limits and politeness
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Hard cap on pages processed; unset means crawl until the frontier drains
    pub max_pages: Option<usize>,

    /// Safety ceiling applied when `max_pages` is unset (default 500)
    pub page_ceiling: usize,

    /// Maximum link depth from the seed; unset means unbounded
    pub max_depth: Option<u32>,

    /// Cap on synthesized pages for one numbered listing (default 200)
    pub max_pagination_pages: u32,

    /// Minimum time between two requests in milliseconds (default 250)
    pub request_delay_ms: u64,

    /// Whether robots.txt of the seed origin is honored (default true)
    pub respect_robots_txt: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            page_ceiling: 500,
            max_depth: None,
            max_pagination_pages: 200,
            request_delay_ms: 250,
            respect_robots_txt: true,
        }
    }
}

/// HTTP request timeouts and retry policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,

    /// Total attempts per URL including the first one
    pub max_attempts: u32,

    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "qa-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Heuristic thresholds used by the extractor
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionConfig {
    /// Minimum characters for a block to count as an answer (default 20)
    pub min_answer_chars: usize,

    /// Longer blocks ending in `?` are treated as prose, not questions (default 300)
    pub max_question_chars: usize,

    /// How many leaf blocks after a question are searched for its answer (default 3)
    pub max_answer_gap: usize,

    /// Minimum characters of thread content (default 20)
    pub min_discussion_chars: usize,

    /// Also turn each discussion into a Q&A record (default false)
    pub convert_discussions: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_answer_chars: 20,
            max_question_chars: 300,
            max_answer_gap: 3,
            min_discussion_chars: 20,
            convert_discussions: false,
        }
    }
}

/// Quality thresholds for the final Q&A set
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationConfig {
    pub min_question_chars: usize,
    pub min_answer_chars: usize,
    pub min_pass_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_question_chars: 10,
            min_answer_chars: 20,
            min_pass_ratio: 0.70,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory for final and intermediate files
    pub directory: String,

    /// Encoding of the final files
    pub format: OutputFormat,

    /// Keep intermediate files after a successful run
    pub keep_checkpoint: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            format: OutputFormat::Jsonl,
            keep_checkpoint: false,
        }
    }
}
