//! Question/answer pairing over a block tree

use super::blocks::BlockTree;
use super::records::QARecord;
use super::rules::{is_answer_candidate, is_continuation, is_question, is_title_block};
use super::text::strip_label;
use crate::config::ExtractionConfig;

/// Pairs question blocks with the answer block that follows them
///
/// A question pairs with the first later leaf, within `max_answer_gap`
/// leaves, that is an answer candidate. A title or another question in
/// between cancels the pairing. Paragraphs directly after the answer with
/// the same parent are appended to it.
///
/// # Arguments
///
/// * `tree` - Blocks of the page
/// * `source` - Page URL recorded on every pair
/// * `config` - Extraction thresholds
///
/// # Returns
///
/// Pairs in document order
pub fn extract_pairs(tree: &BlockTree, source: &str, config: &ExtractionConfig) -> Vec<QARecord> {
    let leaves = tree.leaves();
    let mut records = Vec::new();

    for (pos, &qi) in leaves.iter().enumerate() {
        let Some(question) = tree.get(qi) else { continue };
        if !is_question(question, config) {
            continue;
        }

        let mut answer_at = None;
        for (at, &ci) in leaves.iter().enumerate().skip(pos + 1).take(config.max_answer_gap) {
            let Some(candidate) = tree.get(ci) else { break };
            if is_title_block(candidate) || is_question(candidate, config) {
                break;
            }
            if is_answer_candidate(candidate, config) {
                answer_at = Some(at);
                break;
            }
            tracing::trace!("Skipping short block after question: {:?}", candidate.text);
        }

        let Some(at) = answer_at else {
            tracing::trace!("No answer for question: {:?}", question.text);
            continue;
        };
        let Some(answer_block) = tree.get(leaves[at]) else { continue };

        let mut parts = vec![strip_label(&answer_block.text).to_string()];
        for &next in &leaves[at + 1..] {
            match tree.get(next) {
                Some(block)
                    if block.parent == answer_block.parent && is_continuation(block, config) =>
                {
                    parts.push(block.text.clone());
                }
                _ => break,
            }
        }

        if let Some(record) = QARecord::new(strip_label(&question.text), parts.join("\n"), source) {
            records.push(record);
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::blocks::{Block, BlockKind};

    const SOURCE: &str = "https://example.com/faq";

    fn flat(blocks: &[(BlockKind, &str)]) -> BlockTree {
        let mut tree = BlockTree::new();
        let root = tree.push(Block::container("body", None, 0));
        for (kind, text) in blocks {
            tree.push(Block::leaf(*kind, "p", text.to_string(), Some(root), 1));
        }
        tree
    }

    #[test]
    fn test_simple_pair() {
        let tree = flat(&[
            (BlockKind::Heading(3), "How do I reset my password?"),
            (BlockKind::Paragraph, "Open the settings page and choose reset."),
        ]);
        let pairs = extract_pairs(&tree, SOURCE, &ExtractionConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "How do I reset my password?");
        assert_eq!(pairs[0].answer, "Open the settings page and choose reset.");
        assert_eq!(pairs[0].source, SOURCE);
    }

    #[test]
    fn test_short_block_in_gap_is_skipped() {
        let tree = flat(&[
            (BlockKind::Paragraph, "Can I pay by invoice?"),
            (BlockKind::Paragraph, "Yes."),
            (BlockKind::Paragraph, "Invoices are available on the business plan."),
        ]);
        let pairs = extract_pairs(&tree, SOURCE, &ExtractionConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answer, "Invoices are available on the business plan.");
    }

    #[test]
    fn test_gap_limit() {
        let config = ExtractionConfig {
            max_answer_gap: 1,
            ..ExtractionConfig::default()
        };
        let tree = flat(&[
            (BlockKind::Paragraph, "Can I pay by invoice?"),
            (BlockKind::Paragraph, "Yes."),
            (BlockKind::Paragraph, "Invoices are available on the business plan."),
        ]);
        assert!(extract_pairs(&tree, SOURCE, &config).is_empty());
    }

    #[test]
    fn test_title_cancels_pairing() {
        let tree = flat(&[
            (BlockKind::Paragraph, "Any questions left?"),
            (BlockKind::Heading(2), "Pricing"),
            (BlockKind::Paragraph, "Plans start at ten dollars per month."),
        ]);
        assert!(extract_pairs(&tree, SOURCE, &ExtractionConfig::default()).is_empty());
    }

    #[test]
    fn test_consecutive_questions() {
        let tree = flat(&[
            (BlockKind::Heading(3), "Is there a free tier?"),
            (BlockKind::Heading(3), "Do you offer refunds?"),
            (BlockKind::Paragraph, "Refunds are issued within thirty days."),
        ]);
        let pairs = extract_pairs(&tree, SOURCE, &ExtractionConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "Do you offer refunds?");
    }

    #[test]
    fn test_continuation_paragraphs_appended() {
        let tree = flat(&[
            (BlockKind::Term, "Q: What formats are supported?"),
            (BlockKind::Definition, "A: JSON lines, CSV and plain text."),
            (BlockKind::Paragraph, "More formats may follow."),
            (BlockKind::Heading(2), "Next section"),
        ]);
        let pairs = extract_pairs(&tree, SOURCE, &ExtractionConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "What formats are supported?");
        assert_eq!(pairs[0].answer, "JSON lines, CSV and plain text.\nMore formats may follow.");
    }

    #[test]
    fn test_no_questions() {
        let tree = flat(&[(BlockKind::Paragraph, "Just a paragraph of plain text here.")]);
        assert!(extract_pairs(&tree, SOURCE, &ExtractionConfig::default()).is_empty());
    }
}
