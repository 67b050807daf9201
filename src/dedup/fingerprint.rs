//! Content fingerprints
//!
//! A fingerprint is the SHA-256 of a record's primary text fields after
//! case folding and whitespace collapsing, so trivially different copies of
//! the same content collide.

use crate::extract::{DiscussionRecord, QARecord};
use sha2::{Digest, Sha256};

/// Case-folds and collapses whitespace
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hashes normalized fields, separated so that ("ab", "c") != ("a", "bc")
fn hash_fields(kind: &str, fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    for field in fields {
        hasher.update([0u8]);
        hasher.update(normalize_text(field).as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Fingerprint of a question/answer pair (question + answer)
pub fn qa_fingerprint(record: &QARecord) -> String {
    hash_fields("qa", &[&record.question, &record.answer])
}

/// Fingerprint of a discussion (title + content)
pub fn discussion_fingerprint(record: &DiscussionRecord) -> String {
    hash_fields("discussion", &[&record.title, &record.content])
}
