//! Deduplication module
//!
//! Keeps one record per fingerprint for the whole run. The fingerprint set
//! only grows; on resume it is rebuilt from the checkpointed records.

mod fingerprint;

pub use fingerprint::{discussion_fingerprint, normalize_text, qa_fingerprint};

use crate::extract::{DiscussionRecord, Extraction, QARecord};
use std::collections::HashSet;

/// Set of fingerprints accepted so far
#[derive(Debug, Clone, Default)]
pub struct FingerprintSet {
    seen: HashSet<String>,
}

impl FingerprintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fingerprint; false if it was already present
    pub fn insert(&mut self, fingerprint: String) -> bool {
        self.seen.insert(fingerprint)
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.seen.contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Filters candidate records against the run's fingerprint set
#[derive(Debug, Default)]
pub struct Deduplicator {
    fingerprints: FingerprintSet,
    dropped_qa: usize,
    dropped_discussions: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the fingerprint set from records accepted by an earlier run
    pub fn seeded(qa: &[QARecord], discussions: &[DiscussionRecord]) -> Self {
        let mut dedup = Self::new();
        for record in qa {
            dedup.fingerprints.insert(qa_fingerprint(record));
        }
        for record in discussions {
            dedup.fingerprints.insert(discussion_fingerprint(record));
        }
        dedup
    }

    /// Returns true if the pair is new; it is then remembered
    pub fn accept_qa(&mut self, record: &QARecord) -> bool {
        let accepted = self.fingerprints.insert(qa_fingerprint(record));
        if !accepted {
            self.dropped_qa += 1;
            tracing::trace!("Duplicate pair dropped: {:?}", record.question);
        }
        accepted
    }

    /// Returns true if the discussion is new; it is then remembered
    pub fn accept_discussion(&mut self, record: &DiscussionRecord) -> bool {
        let accepted = self.fingerprints.insert(discussion_fingerprint(record));
        if !accepted {
            self.dropped_discussions += 1;
            tracing::trace!("Duplicate discussion dropped: {:?}", record.title);
        }
        accepted
    }

    /// Keeps only the records of a page not seen before, preserving order
    pub fn filter(&mut self, extraction: Extraction) -> Extraction {
        Extraction {
            qa: extraction.qa.into_iter().filter(|r| self.accept_qa(r)).collect(),
            discussions: extraction
                .discussions
                .into_iter()
                .filter(|r| self.accept_discussion(r))
                .collect(),
        }
    }

    pub fn dropped_qa(&self) -> usize {
        self.dropped_qa
    }

    pub fn dropped_discussions(&self) -> usize {
        self.dropped_discussions
    }

    pub fn fingerprints(&self) -> &FingerprintSet {
        &self.fingerprints
    }
}
