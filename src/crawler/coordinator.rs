//! Crawl coordinator implementation
//!
//! The coordinator is the main orchestrator of a harvest. It is responsible for:
//! - Opening (or resuming) the checkpoint store
//! - Fetching robots.txt and pacing requests
//! - Driving each page through its lifecycle states
//! - Feeding pagination and same-site links back into the frontier
//! - Deduplicating and checkpointing accepted records after every page
//! - Validating and writing the final output files

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::{effective_delay, Frontier, RequestPacer, Termination};
use crate::crawler::pagination::{Pagination, PaginationDiscoverer};
use crate::crawler::parser::{Document, Link};
use crate::dedup::Deduplicator;
use crate::extract::{Extraction, Extractor};
use crate::output::{write_outputs, CrawlStatistics, OutputPaths};
use crate::robots::{fetch_robots, RobotsRules};
use crate::state::{CrawlTarget, PageState};
use crate::storage::{
    CheckpointError, CheckpointMode, CheckpointRecords, CheckpointStore, FileCheckpoint,
};
use crate::validate::{validate_records, ValidationReport};
use crate::HarvestError;
use std::path::{Path, PathBuf};
use std::time::Instant;
use url::Url;

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub statistics: CrawlStatistics,
    pub validation: ValidationReport,
    pub paths: OutputPaths,
    /// `None` when the output was rendered from a checkpoint without crawling
    pub termination: Option<Termination>,
}

/// Everything one parsed page contributes to the run
struct PageOutput {
    pagination: Pagination,
    links: Vec<Link>,
    extraction: Extraction,
}

/// Main crawl coordinator
///
/// Owns the frontier, the fingerprint set and the checkpoint store of one
/// run. Pages are processed strictly one at a time.
pub struct Coordinator {
    config: Config,
    frontier: Frontier,
    fetcher: Fetcher,
    discoverer: PaginationDiscoverer,
    extractor: Extractor,
    dedup: Deduplicator,
    checkpoint: FileCheckpoint,
    stats: CrawlStatistics,
    resumed: bool,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `seed` - The normalized seed URL
    /// * `fresh` - Ignore any checkpoint left by an earlier run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The output directory is not writable or the
    ///   checkpoint cannot be read
    pub fn new(config: Config, seed: Url, fresh: bool) -> Result<Self, HarvestError> {
        let dir = output_dir(&config);

        let previous = if fresh {
            None
        } else {
            FileCheckpoint::reader(&dir)
                .load_state()
                .map_err(unwritable)?
                .filter(|state| state.seed == seed)
        };

        let (frontier, dedup, mode) = match previous {
            Some(mut state) => {
                // Limits come from the current invocation, not the interrupted one
                state.max_pages = config.crawler.max_pages;
                state.page_ceiling = config.crawler.page_ceiling;
                state.max_depth = config.crawler.max_depth;

                let records = FileCheckpoint::reader(&dir).load_records()?;
                tracing::info!(
                    "Resuming crawl of {}: {} pages done, {} pending, {} pairs and {} discussions checkpointed",
                    seed,
                    state.pages_processed,
                    state.pending.len(),
                    records.qa.len(),
                    records.discussions.len()
                );
                let dedup = Deduplicator::seeded(&records.qa, &records.discussions);
                (Frontier::from_state(state), dedup, CheckpointMode::Resume)
            }
            None => {
                tracing::info!("Starting fresh crawl of {}", seed);
                (
                    Frontier::new(seed, &config.crawler),
                    Deduplicator::new(),
                    CheckpointMode::Fresh,
                )
            }
        };

        let resumed = mode == CheckpointMode::Resume;
        let checkpoint = FileCheckpoint::open(&dir, mode).map_err(unwritable)?;
        let fetcher = Fetcher::new(&config.fetch, &config.user_agent)?;

        Ok(Self {
            discoverer: PaginationDiscoverer::new(config.crawler.max_pagination_pages),
            extractor: Extractor::new(config.extraction.clone()),
            config,
            frontier,
            fetcher,
            dedup,
            checkpoint,
            stats: CrawlStatistics::new(),
            resumed,
        })
    }

    /// True when an earlier checkpoint was picked up
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs the crawl to completion and writes the final files
    ///
    /// This method:
    /// 1. Loads robots.txt and sets up request pacing
    /// 2. Processes pages until a termination condition holds
    /// 3. Validates every accepted pair
    /// 4. Writes the final files and removes the checkpoint
    ///
    /// Per-page failures are logged and counted; only setup failures, an
    /// unreachable seed and checkpoint/output write errors end the run.
    pub async fn run(&mut self) -> Result<CrawlOutcome, HarvestError> {
        let seed = self.frontier.seed().clone();
        let agent = self.config.user_agent.crawler_name.clone();

        let robots = if self.config.crawler.respect_robots_txt {
            fetch_robots(&self.fetcher, &seed, &agent).await
        } else {
            RobotsRules::allow_all(&agent)
        };

        let delay = effective_delay(&self.config.crawler, robots.crawl_delay());
        tracing::debug!("Minimum delay between requests: {:?}", delay);
        let mut pacer = RequestPacer::new(delay);

        let start = Instant::now();
        let mut require_seed = self.frontier.pages_processed() == 0;

        while let Some(target) = self.frontier.next() {
            let outcome = self
                .process_target(&target, &robots, &mut pacer, require_seed)
                .await?;
            require_seed = false;

            outcome.transition(PageState::Processed)?;
            self.stats.record_page(outcome);
            self.frontier.mark_processed();
            self.checkpoint.save_state(self.frontier.state())?;

            let processed = self.frontier.pages_processed();
            if processed % 10 == 0 {
                let elapsed = start.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    processed as f64 / elapsed
                } else {
                    0.0
                };
                tracing::info!(
                    "Progress: {} pages processed, {} in frontier, {:.2} pages/sec",
                    processed,
                    self.frontier.pending_len(),
                    rate
                );
            }
        }

        let termination = self.frontier.termination().unwrap_or(Termination::Exhausted);
        tracing::info!(
            "Crawl completed ({}): {} pages processed",
            termination,
            self.frontier.pages_processed()
        );

        let mut stats = std::mem::take(&mut self.stats);
        stats.termination = Some(termination.to_string());

        let records = self.checkpoint.load_records()?;
        let (validation, paths) = finalize(&self.config, &records, &mut stats)?;

        if self.config.output.keep_checkpoint {
            tracing::info!("Keeping checkpoint in {}", self.checkpoint.dir().display());
        } else {
            self.checkpoint.clear()?;
        }

        Ok(CrawlOutcome {
            statistics: stats,
            validation,
            paths,
            termination: Some(termination),
        })
    }

    /// Takes one target from `Queued` to the state it ends in before `Processed`
    async fn process_target(
        &mut self,
        target: &CrawlTarget,
        robots: &RobotsRules,
        pacer: &mut RequestPacer,
        require_seed: bool,
    ) -> Result<PageState, HarvestError> {
        let state = PageState::Queued;

        if !robots.is_allowed(&target.url) {
            tracing::info!("Skipping {} (disallowed by robots.txt)", target.url);
            return state.transition(PageState::Skipped);
        }

        let state = state.transition(PageState::Fetching)?;
        pacer.wait().await;
        tracing::debug!("Fetching {} (depth {})", target.url, target.depth);

        let page = match self.fetcher.fetch(&target.url).await {
            Ok(page) => page,
            Err(e) if require_seed => {
                return Err(HarvestError::SeedUnreachable {
                    url: target.url.to_string(),
                    reason: e.kind.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("{}", e);
                return state.transition(PageState::FetchFailed);
            }
        };

        let state = state.transition(PageState::Parsed)?;
        let output = self.parse_page(target, &page);

        self.enqueue_discovered(target, output.pagination, &output.links);

        let extracted_qa = output.extraction.qa.len();
        let extracted_discussions = output.extraction.discussions.len();
        let accepted = self.dedup.filter(output.extraction);

        self.stats.qa_extracted += extracted_qa as u64;
        self.stats.discussions_extracted += extracted_discussions as u64;
        self.stats.qa_accepted += accepted.qa.len() as u64;
        self.stats.discussions_accepted += accepted.discussions.len() as u64;

        tracing::debug!(
            "{}: {} of {} pairs and {} of {} discussions accepted",
            target.url,
            accepted.qa.len(),
            extracted_qa,
            accepted.discussions.len(),
            extracted_discussions
        );

        self.checkpoint
            .append_page(&accepted.qa, &accepted.discussions)?;

        Ok(state)
    }

    /// Parses a fetched body and runs discovery and extraction on it
    ///
    /// The parsed document never crosses an await point.
    fn parse_page(&self, target: &CrawlTarget, page: &FetchResult) -> PageOutput {
        let document = Document::parse(&page.body, &page.final_url);
        let links = document.links();
        let pagination = self
            .discoverer
            .discover(&target.url, target.pagination, &links);
        let tree = document.block_tree();
        let extraction = self.extractor.extract(&tree, target.url.as_str());

        PageOutput {
            pagination,
            links,
            extraction,
        }
    }

    /// Adds pagination targets, then plain links, to the frontier
    fn enqueue_discovered(&mut self, target: &CrawlTarget, pagination: Pagination, links: &[Link]) {
        let mut queued = 0;

        let listing: Vec<CrawlTarget> = match pagination {
            Pagination::Next { url, position } => {
                vec![CrawlTarget::listing_page(url, target, position)]
            }
            Pagination::Numbered(pages) => pages
                .into_iter()
                .map(|(position, url)| CrawlTarget::listing_page(url, target, position))
                .collect(),
            Pagination::Single => Vec::new(),
        };

        for next in listing {
            if self.frontier.enqueue(next).is_queued() {
                queued += 1;
            }
        }

        for link in links {
            if self
                .frontier
                .enqueue(CrawlTarget::link(link.url.clone(), target))
                .is_queued()
            {
                queued += 1;
            }
        }

        tracing::trace!("{} new targets from {}", queued, target.url);
    }
}

/// Writes final files from the records left in a checkpoint, without crawling
///
/// # Arguments
///
/// * `config` - Configuration naming the output directory and format
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Files were written
/// * `Err(HarvestError)` - The checkpoint is unreadable or the output unwritable
pub fn render_from_checkpoint(config: &Config) -> Result<CrawlOutcome, HarvestError> {
    let dir = output_dir(config);
    let checkpoint = FileCheckpoint::reader(&dir);
    if !checkpoint.exists() {
        tracing::warn!("No checkpoint found in {}", dir.display());
    }

    let records = checkpoint.load_records()?;
    tracing::info!(
        "Rendering {} pairs and {} discussions from checkpoint",
        records.qa.len(),
        records.discussions.len()
    );

    let mut stats = CrawlStatistics::new();
    stats.qa_extracted = records.qa.len() as u64;
    stats.qa_accepted = stats.qa_extracted;
    stats.discussions_extracted = records.discussions.len() as u64;
    stats.discussions_accepted = stats.discussions_extracted;

    let (validation, paths) = finalize(config, &records, &mut stats)?;

    Ok(CrawlOutcome {
        statistics: stats,
        validation,
        paths,
        termination: None,
    })
}

/// Validates the accepted pairs and writes both final files
fn finalize(
    config: &Config,
    records: &CheckpointRecords,
    stats: &mut CrawlStatistics,
) -> Result<(ValidationReport, OutputPaths), HarvestError> {
    if records.truncated_lines > 0 {
        tracing::warn!(
            "Ignored {} partially written checkpoint line(s)",
            records.truncated_lines
        );
    }

    let validation = validate_records(&records.qa, &config.validation);
    if validation.verdict.is_pass() {
        tracing::info!(
            "Validation passed: {:.1}% of {} pairs",
            validation.pass_ratio * 100.0,
            validation.total
        );
    } else {
        tracing::warn!(
            "Validation {}: {:.1}% of {} pairs pass (need {:.0}%); writing output anyway",
            validation.verdict,
            validation.pass_ratio * 100.0,
            validation.total,
            config.validation.min_pass_ratio * 100.0
        );
    }

    let paths = write_outputs(
        &output_dir(config),
        config.output.format,
        &records.qa,
        &records.discussions,
    )?;

    stats.validation = Some(validation.clone());
    stats.finish();

    Ok((validation, paths))
}

fn output_dir(config: &Config) -> PathBuf {
    Path::new(&config.output.directory).to_path_buf()
}

/// An I/O failure while opening the checkpoint means the output directory is unusable
fn unwritable(e: CheckpointError) -> HarvestError {
    match e {
        CheckpointError::Io { path, source } => HarvestError::OutputUnwritable { path, source },
        other => HarvestError::Checkpoint(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlerConfig, OutputConfig};
    use crate::extract::QARecord;
    use tempfile::TempDir;

    fn test_config(dir: &Path) -> Config {
        Config {
            crawler: CrawlerConfig {
                request_delay_ms: 0,
                respect_robots_txt: false,
                ..CrawlerConfig::default()
            },
            output: OutputConfig {
                directory: dir.display().to_string(),
                ..OutputConfig::default()
            },
            ..Config::default()
        }
    }

    fn seed() -> Url {
        Url::parse("https://example.com/faq").unwrap()
    }

    #[test]
    fn test_fresh_coordinator() {
        let dir = TempDir::new().unwrap();
        let coordinator = Coordinator::new(test_config(dir.path()), seed(), false).unwrap();

        assert!(!coordinator.is_resumed());
        assert_eq!(coordinator.frontier().pending_len(), 1);
        assert!(dir.path().join("data_qa_intermediate.jsonl").exists());
    }

    /// Leaves a checkpoint of one processed page holding one accepted pair
    fn checkpoint_one_page(dir: &Path, config: &Config) {
        let mut checkpoint = FileCheckpoint::open(dir, CheckpointMode::Fresh).unwrap();
        let pair = QARecord::new(
            "How do I reset my password?",
            "Open the account settings and choose reset.",
            seed().as_str(),
        )
        .unwrap();
        checkpoint.append_page(&[pair], &[]).unwrap();

        let mut frontier = Frontier::new(seed(), &config.crawler);
        frontier.next().unwrap();
        frontier.mark_processed();
        checkpoint.save_state(frontier.state()).unwrap();
    }

    #[test]
    fn test_resume_requires_same_seed() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        checkpoint_one_page(dir.path(), &config);

        let resumed = Coordinator::new(config.clone(), seed(), false).unwrap();
        assert!(resumed.is_resumed());
        assert_eq!(resumed.frontier().pages_processed(), 1);
        drop(resumed);

        let other = Url::parse("https://example.org/").unwrap();
        assert!(!Coordinator::new(config, other, false).unwrap().is_resumed());
    }

    #[test]
    fn test_other_seed_run_does_not_orphan_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        checkpoint_one_page(dir.path(), &config);

        // A run for another seed that never completes a page
        let other = Url::parse("https://example.org/").unwrap();
        drop(Coordinator::new(config.clone(), other, false).unwrap());

        let coordinator = Coordinator::new(config, seed(), false).unwrap();
        let records = FileCheckpoint::reader(dir.path()).load_records().unwrap();
        assert!(!coordinator.is_resumed());
        assert_eq!(coordinator.frontier().pages_processed(), 0);
        assert!(records.qa.len() >= coordinator.frontier().pages_processed());
    }

    #[test]
    fn test_fresh_run_does_not_orphan_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        checkpoint_one_page(dir.path(), &config);

        drop(Coordinator::new(config.clone(), seed(), true).unwrap());

        let coordinator = Coordinator::new(config, seed(), false).unwrap();
        assert!(!coordinator.is_resumed());
        assert_eq!(coordinator.frontier().pending_len(), 1);
    }

    #[test]
    fn test_unwritable_output_directory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = Coordinator::new(test_config(&blocker.join("out")), seed(), true);
        assert!(matches!(result, Err(HarvestError::OutputUnwritable { .. })));
    }

    #[test]
    fn test_render_from_empty_checkpoint() {
        let dir = TempDir::new().unwrap();
        let outcome = render_from_checkpoint(&test_config(dir.path())).unwrap();

        assert_eq!(outcome.validation.total, 0);
        assert!(!outcome.validation.verdict.is_pass());
        assert!(outcome.paths.qa.exists());
        assert!(outcome.termination.is_none());
    }
}
