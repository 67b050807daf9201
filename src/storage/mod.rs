//! Storage module for checkpointing crawl progress
//!
//! This module handles the intermediate store of a run:
//! - Appending accepted records after every page
//! - Snapshotting the crawl state for resumption
//! - Recovering records after an interruption

mod file;
mod traits;

pub use file::{
    CheckpointMode, FileCheckpoint, DISCUSSION_INTERMEDIATE, QA_INTERMEDIATE, STATE_FILE,
};
pub use traits::{CheckpointError, CheckpointRecords, CheckpointResult, CheckpointStore};
