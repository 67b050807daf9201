//! Run statistics
//!
//! This module collects per-run counters during a crawl and displays them
//! together with the validation report once the run is over.

use crate::state::PageState;
use crate::validate::ValidationReport;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Final outcome of each page, by the state it reached before `Processed`
    pub pages_by_state: HashMap<PageState, u64>,

    /// Candidate pairs produced by extraction
    pub qa_extracted: u64,
    /// Pairs that survived deduplication
    pub qa_accepted: u64,

    pub discussions_extracted: u64,
    pub discussions_accepted: u64,

    /// Why the crawl loop stopped
    pub termination: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    pub validation: Option<ValidationReport>,
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            pages_by_state: HashMap::new(),
            qa_extracted: 0,
            qa_accepted: 0,
            discussions_extracted: 0,
            discussions_accepted: 0,
            termination: None,
            started_at: Utc::now(),
            finished_at: None,
            validation: None,
        }
    }

    /// Counts one finished page under the outcome it reached
    pub fn record_page(&mut self, outcome: PageState) {
        *self.pages_by_state.entry(outcome).or_insert(0) += 1;
    }

    fn pages_in(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Pages fetched and parsed
    pub fn pages_parsed(&self) -> u64 {
        self.pages_in(PageState::Parsed)
    }

    pub fn pages_failed(&self) -> u64 {
        self.pages_in(PageState::FetchFailed)
    }

    /// Pages refused by robots.txt
    pub fn pages_skipped(&self) -> u64 {
        self.pages_in(PageState::Skipped)
    }

    pub fn total_pages(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    pub fn duplicates_dropped(&self) -> u64 {
        (self.qa_extracted - self.qa_accepted) + (self.discussions_extracted - self.discussions_accepted)
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    if let Some(reason) = &stats.termination {
        println!("  Stopped because: {}", reason);
    }
    println!();

    println!("Pages:");
    println!("  Processed: {}", stats.total_pages());
    println!("  Parsed: {}", stats.pages_parsed());
    println!("  Failed: {}", stats.pages_failed());
    println!("  Skipped (robots.txt): {}", stats.pages_skipped());
    println!();

    println!("Records:");
    println!(
        "  Q&A pairs: {} accepted of {} extracted",
        stats.qa_accepted, stats.qa_extracted
    );
    println!(
        "  Discussions: {} accepted of {} extracted",
        stats.discussions_accepted, stats.discussions_extracted
    );
    println!("  Duplicates dropped: {}", stats.duplicates_dropped());
    println!();

    if let Some(report) = &stats.validation {
        println!("Validation: {}", report.verdict);
        println!(
            "  Pass ratio: {:.1}% ({} / {} pairs)",
            report.pass_ratio * 100.0,
            report.passing,
            report.total
        );
        println!("  Question too short: {}", report.question_length_failures());
        println!("  Answer too short: {}", report.answer_length_failures());
        println!("  Missing '?': {}", report.question_mark_failures());

        if !report.issues.is_empty() {
            println!("  Issues:");
            for issue in &report.issues {
                println!("    - {}", issue);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_counters() {
        let mut stats = CrawlStatistics::new();
        stats.record_page(PageState::Parsed);
        stats.record_page(PageState::Parsed);
        stats.record_page(PageState::FetchFailed);
        stats.record_page(PageState::Skipped);

        assert_eq!(stats.total_pages(), 4);
        assert_eq!(stats.pages_parsed(), 2);
        assert_eq!(stats.pages_failed(), 1);
        assert_eq!(stats.pages_skipped(), 1);
    }

    #[test]
    fn test_duplicates_dropped() {
        let mut stats = CrawlStatistics::new();
        stats.qa_extracted = 3;
        stats.qa_accepted = 2;
        stats.discussions_extracted = 4;
        stats.discussions_accepted = 4;
        assert_eq!(stats.duplicates_dropped(), 1);
    }

    #[test]
    fn test_duration() {
        let mut stats = CrawlStatistics::new();
        assert_eq!(stats.duration_seconds(), None);
        stats.finish();
        assert!(stats.duration_seconds().unwrap() >= 0);
    }
}
