//! Robots.txt handling module
//!
//! The crawl stays on one origin, so robots.txt is fetched once per run and
//! consulted before every page request.

mod parser;

pub use parser::RobotsRules;

use crate::crawler::Fetcher;
use url::Url;

/// Fetches and parses robots.txt for the origin of `site`
///
/// Any failure (missing file, non-2xx status, network error) yields
/// permissive rules; robots.txt problems never stop a crawl.
pub async fn fetch_robots(fetcher: &Fetcher, site: &Url, agent: &str) -> RobotsRules {
    let robots_url = match site.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", site, e);
            return RobotsRules::allow_all(agent);
        }
    };

    match fetcher.fetch_plain(&robots_url).await {
        Ok(body) => {
            tracing::debug!("Loaded robots.txt from {}", robots_url);
            RobotsRules::from_content(&body, agent)
        }
        Err(e) => {
            tracing::debug!("No usable robots.txt ({}), allowing all", e);
            RobotsRules::allow_all(agent)
        }
    }
}
