//! Content extraction module
//!
//! Turns a page's block tree into question/answer pairs and discussion
//! threads. The two rules run independently over the same tree:
//!
//! - `qa`: a question block followed closely by an answer block
//! - `discussion`: a titled container holding reply containers
//!
//! Optionally every discussion is also converted into a pair (`convert`).

mod blocks;
mod convert;
mod discussion;
mod qa;
mod records;
pub mod rules;
mod text;

pub use blocks::{Block, BlockKind, BlockTree};
pub use convert::discussion_to_qa;
pub use discussion::extract_threads;
pub use qa::extract_pairs;
pub use records::{DiscussionRecord, QARecord};
pub use text::{char_len, clean_text};

use crate::config::ExtractionConfig;

/// Records found on one page, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub qa: Vec<QARecord>,
    pub discussions: Vec<DiscussionRecord>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.qa.is_empty() && self.discussions.is_empty()
    }
}

/// Applies the extraction rules with one configuration
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extracts candidate records from one page
    ///
    /// A page yielding nothing is not an error.
    pub fn extract(&self, tree: &BlockTree, source: &str) -> Extraction {
        let mut qa = extract_pairs(tree, source, &self.config);
        let discussions = extract_threads(tree, source, &self.config);

        if self.config.convert_discussions {
            qa.extend(discussions.iter().filter_map(discussion_to_qa));
        }

        tracing::trace!(
            "{}: {} blocks, {} pairs, {} threads",
            source,
            tree.len(),
            qa.len(),
            discussions.len()
        );

        Extraction { qa, discussions }
    }
}
