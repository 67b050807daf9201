//! URL handling module for QA-Harvest
//!
//! This module provides URL normalization and the same-origin test that
//! scopes a crawl to the seed's site.

mod domain;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{same_origin, site_host};
pub use normalize::{normalize, normalize_url};

/// Parses and normalizes the seed URL of a crawl
///
/// The seed must be an absolute http(s) URL with a host; anything else is a
/// fatal setup error for the run.
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let trimmed = seed.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Malformed("seed URL is empty".to_string()));
    }
    normalize_url(trimmed)
}
