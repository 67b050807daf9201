//! Crawl frontier and request pacing
//!
//! This module handles:
//! - The priority queue of targets still to visit
//! - The visited set that keeps every URL to a single visit
//! - Page limits that guarantee termination
//! - Minimum delays between requests, including robots.txt crawl delays

use crate::config::CrawlerConfig;
use crate::state::{CrawlState, CrawlTarget, QueuedTarget};
use crate::url::{normalize, same_origin};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// Why the frontier stopped handing out targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Nothing left to visit
    Exhausted,
    /// The configured `max-pages` was reached
    PageLimit(usize),
    /// No page cap was set and the safety ceiling was reached
    Ceiling(usize),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "frontier exhausted"),
            Self::PageLimit(n) => write!(f, "page limit of {} reached", n),
            Self::Ceiling(n) => write!(f, "safety ceiling of {} pages reached", n),
        }
    }
}

/// Outcome of offering a target to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    AlreadySeen,
    OffSite,
    TooDeep,
    Invalid,
}

impl EnqueueOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// The work queue of one crawl
///
/// Owns the run's `CrawlState` exclusively; the coordinator reads it only
/// to checkpoint it.
#[derive(Debug)]
pub struct Frontier {
    state: CrawlState,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    ///
    /// # Arguments
    ///
    /// * `seed` - The normalized seed URL
    /// * `config` - Crawler limits (page cap, ceiling, depth)
    pub fn new(seed: Url, config: &CrawlerConfig) -> Self {
        let state = CrawlState::new(
            seed.clone(),
            config.max_pages,
            config.page_ceiling,
            config.max_depth,
        );
        let mut frontier = Self { state };
        frontier.enqueue(CrawlTarget::seed(seed));
        frontier
    }

    /// Restores a frontier from a checkpointed state
    pub fn from_state(state: CrawlState) -> Self {
        Self { state }
    }

    /// Offers a target to the frontier
    ///
    /// The URL is normalized first. Targets off the seed's site, deeper than
    /// `max-depth`, or already seen are dropped.
    pub fn enqueue(&mut self, mut target: CrawlTarget) -> EnqueueOutcome {
        target.url = match normalize(target.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Dropping unnormalizable URL: {}", e);
                return EnqueueOutcome::Invalid;
            }
        };

        if !same_origin(&target.url, &self.state.seed) {
            tracing::debug!("Dropping off-site URL {}", target.url);
            return EnqueueOutcome::OffSite;
        }

        if let Some(max_depth) = self.state.max_depth {
            if target.depth > max_depth {
                tracing::debug!("Dropping {} at depth {}", target.url, target.depth);
                return EnqueueOutcome::TooDeep;
            }
        }

        if !self.state.visited.insert(target.url.to_string()) {
            return EnqueueOutcome::AlreadySeen;
        }

        let seq = self.state.next_seq;
        self.state.next_seq += 1;
        tracing::trace!("Queued {} (seq {}, page {:?})", target.url, seq, target.pagination);
        self.state.pending.push(QueuedTarget { target, seq });
        EnqueueOutcome::Queued
    }

    /// Reason to stop, checked before every dequeue
    pub fn termination(&self) -> Option<Termination> {
        if self.state.limit_reached() {
            return Some(match self.state.max_pages {
                Some(limit) => Termination::PageLimit(limit),
                None => Termination::Ceiling(self.state.page_ceiling),
            });
        }
        if self.state.pending.is_empty() {
            return Some(Termination::Exhausted);
        }
        None
    }

    /// Takes the next target, or `None` once a termination condition holds
    pub fn next(&mut self) -> Option<CrawlTarget> {
        if self.termination().is_some() {
            return None;
        }
        self.state.pending.pop().map(|queued| queued.target)
    }

    /// Counts a dequeued target as finished
    pub fn mark_processed(&mut self) {
        self.state.pages_processed += 1;
        self.state.updated_at = chrono::Utc::now();
    }

    pub fn pages_processed(&self) -> usize {
        self.state.pages_processed
    }

    pub fn pending_len(&self) -> usize {
        self.state.pending.len()
    }

    pub fn seed(&self) -> &Url {
        &self.state.seed
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }
}

/// Calculates the effective delay between requests
///
/// This takes the maximum of:
/// - The configured request delay
/// - The robots.txt crawl delay (if specified)
pub fn effective_delay(config: &CrawlerConfig, robots_delay: Option<Duration>) -> Duration {
    let config_delay = Duration::from_millis(config.request_delay_ms);
    std::cmp::max(config_delay, robots_delay.unwrap_or(Duration::ZERO))
}

/// Spaces requests to the crawled site
#[derive(Debug)]
pub struct RequestPacer {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RequestPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Time left before the next request may start
    pub fn time_until_ready(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => (last + self.delay).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Sleeps until the next request may start, then records it
    pub async fn wait(&mut self) {
        let wait = self.time_until_ready(Instant::now());
        if !wait.is_zero() {
            tracing::trace!("Waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }
        self.last_request = Some(Instant::now());
    }
}
