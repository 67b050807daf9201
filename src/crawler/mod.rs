//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing into links and a block tree
//! - Pagination discovery
//! - The frontier and request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod pagination;
mod parser;

pub use coordinator::{render_from_checkpoint, Coordinator, CrawlOutcome};
pub use fetcher::{
    build_http_client, is_html_content_type, FailureKind, FetchFailed, FetchResult, Fetcher,
    RetryPolicy,
};
pub use frontier::{effective_delay, EnqueueOutcome, Frontier, RequestPacer, Termination};
pub use pagination::{page_index, PageIndex, Pagination, PaginationDiscoverer};
pub use parser::{Document, Link};

use crate::config::Config;
use crate::url::parse_seed;
use crate::HarvestError;

/// Runs a complete harvest of one site
///
/// This is the main entry point for a crawl. It will:
/// 1. Parse and normalize the seed URL
/// 2. Open or resume the checkpoint in the output directory
/// 3. Crawl, extract and deduplicate page by page
/// 4. Validate and write the final files
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `seed` - The seed URL as given by the user
/// * `fresh` - Ignore any existing checkpoint
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl and write phase completed
/// * `Err(HarvestError)` - A fatal setup or write error
pub async fn harvest(config: Config, seed: &str, fresh: bool) -> Result<CrawlOutcome, HarvestError> {
    let seed = parse_seed(seed)?;
    let mut coordinator = Coordinator::new(config, seed, fresh)?;
    coordinator.run().await
}
