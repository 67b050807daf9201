//! Named predicates used by the Q&A and discussion rules
//!
//! Each predicate looks at generic structural signals only (block kind,
//! text length, punctuation, nesting), never at site-specific markup.

use super::blocks::{Block, BlockKind, BlockTree};
use super::text::{char_len, strip_label};
use crate::config::ExtractionConfig;

/// Shortest text accepted as a question, in characters
const MIN_QUESTION_CHARS: usize = 5;

/// A leaf whose text reads as a single question
pub fn is_question(block: &Block, config: &ExtractionConfig) -> bool {
    if block.kind.is_container() || block.kind == BlockKind::Preformatted {
        return false;
    }
    let text = strip_label(&block.text);
    let len = char_len(text);
    text.ends_with('?') && len >= MIN_QUESTION_CHARS && len <= config.max_question_chars
}

/// Headings and `<summary>` elements
pub fn is_title_block(block: &Block) -> bool {
    matches!(block.kind, BlockKind::Heading(_) | BlockKind::Summary)
}

/// A leaf long enough to answer a question
pub fn is_answer_candidate(block: &Block, config: &ExtractionConfig) -> bool {
    !block.kind.is_container()
        && !is_title_block(block)
        && !is_question(block, config)
        && char_len(strip_label(&block.text)) >= config.min_answer_chars
}

/// A block that may continue an answer started by the previous block
pub fn is_continuation(block: &Block, config: &ExtractionConfig) -> bool {
    matches!(
        block.kind,
        BlockKind::Paragraph | BlockKind::ListItem | BlockKind::Definition | BlockKind::Preformatted
    ) && !block.text.is_empty()
        && !is_question(block, config)
}

/// A child of a thread that carries reply text
pub fn is_reply_block(tree: &BlockTree, index: usize) -> bool {
    match tree.get(index) {
        Some(block) if block.kind.is_container() => !tree.text_of(index).trim().is_empty(),
        _ => false,
    }
}

/// A container whose first or second child is a title followed later by a reply container
///
/// Returns the index of the title block.
pub fn thread_title(tree: &BlockTree, index: usize) -> Option<usize> {
    if !tree.get(index)?.kind.is_container() {
        return None;
    }
    let children = tree.children(index);
    let position = children
        .iter()
        .take(2)
        .position(|&c| tree.get(c).is_some_and(is_title_block))?;

    children[position + 1..]
        .iter()
        .any(|&c| is_reply_block(tree, c))
        .then_some(children[position])
}
