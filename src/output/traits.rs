//! Output traits and error types
//!
//! This module defines the record interface shared by every encoding and
//! associated error types.

use crate::extract::{DiscussionRecord, QARecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to decode line {line}: {message}")]
    Decode { line: usize, message: String },

    #[error("The {0} encoding cannot be decoded")]
    NotDecodable(&'static str),
}

impl OutputError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A record stream that can be written in every output encoding
pub trait Record: Serialize + DeserializeOwned {
    /// Stream name used in file names (`data_<name>.<ext>`)
    const STREAM: &'static str;

    /// Column order of the tabular encoding
    const COLUMNS: &'static [&'static str];

    /// Human-readable block for the plain text encoding, without the blank separator line
    fn display_text(&self) -> String;
}

impl Record for QARecord {
    const STREAM: &'static str = "qa";
    const COLUMNS: &'static [&'static str] = &["question", "answer", "source"];

    fn display_text(&self) -> String {
        format!("Q: {}\nA: {}\nSource: {}\n", self.question, self.answer, self.source)
    }
}

impl Record for DiscussionRecord {
    const STREAM: &'static str = "discussion";
    const COLUMNS: &'static [&'static str] = &["title", "content", "source"];

    fn display_text(&self) -> String {
        format!(
            "Title: {}\nContent: {}\nSource: {}\n",
            self.title, self.content, self.source
        )
    }
}
