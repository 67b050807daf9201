//! Checkpoint store traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::extract::{DiscussionRecord, QARecord};
use crate::state::CrawlState;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Corrupt record in {path} at line {line}: {message}")]
    Corrupt {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckpointError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Records recovered from an intermediate store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckpointRecords {
    pub qa: Vec<QARecord>,
    pub discussions: Vec<DiscussionRecord>,
    /// Partially written trailing lines that were ignored
    pub truncated_lines: usize,
}

impl CheckpointRecords {
    pub fn is_empty(&self) -> bool {
        self.qa.is_empty() && self.discussions.is_empty()
    }
}

/// Trait for checkpoint backend implementations
///
/// A checkpoint holds every record accepted so far plus a snapshot of the
/// crawl state, durable after each completed page.
pub trait CheckpointStore {
    // ===== Records =====

    /// Appends the records accepted on one page
    ///
    /// Records are durable when this returns; each accepted record is passed
    /// here exactly once, in acceptance order.
    fn append_page(
        &mut self,
        qa: &[QARecord],
        discussions: &[DiscussionRecord],
    ) -> CheckpointResult<()>;

    /// Loads every record stored so far
    fn load_records(&self) -> CheckpointResult<CheckpointRecords>;

    // ===== Crawl State =====

    /// Replaces the crawl state snapshot atomically
    fn save_state(&mut self, state: &CrawlState) -> CheckpointResult<()>;

    /// Loads the crawl state snapshot, if one exists
    fn load_state(&self) -> CheckpointResult<Option<CrawlState>>;

    // ===== Lifecycle =====

    /// Removes all intermediate data
    fn clear(&mut self) -> CheckpointResult<()>;
}
