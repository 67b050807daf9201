//! Record types produced by extraction

use serde::{Deserialize, Serialize};

/// A question paired with its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QARecord {
    pub question: String,
    pub answer: String,
    /// URL of the page the pair was found on
    pub source: String,
}

impl QARecord {
    /// Builds a record; `None` when the question is empty
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<Self> {
        let question = question.into();
        if question.trim().is_empty() {
            return None;
        }
        Some(Self {
            question,
            answer: answer.into(),
            source: source.into(),
        })
    }
}

/// A forum-style thread: title plus the concatenated replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionRecord {
    pub title: String,
    pub content: String,
    pub source: String,
}

impl DiscussionRecord {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: source.into(),
        }
    }
}
