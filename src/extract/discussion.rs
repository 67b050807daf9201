//! Thread detection over a block tree

use super::blocks::BlockTree;
use super::records::DiscussionRecord;
use super::rules::thread_title;
use super::text::char_len;
use crate::config::ExtractionConfig;

/// Finds thread-like containers and turns each into one discussion record
///
/// When qualifying containers nest, only the innermost ones are kept so a
/// listing of threads yields one record per thread rather than one for the
/// whole listing.
pub fn extract_threads(
    tree: &BlockTree,
    source: &str,
    config: &ExtractionConfig,
) -> Vec<DiscussionRecord> {
    let threads: Vec<(usize, usize)> = tree
        .iter()
        .filter_map(|(i, _)| thread_title(tree, i).map(|title| (i, title)))
        .collect();

    threads
        .iter()
        .filter(|(outer, _)| !threads.iter().any(|(inner, _)| tree.contains(*outer, *inner)))
        .filter_map(|&(container, title_at)| {
            let title = tree.text_of(title_at);
            let replies: Vec<String> = tree
                .children(container)
                .into_iter()
                .skip_while(|&c| c != title_at)
                .skip(1)
                .map(|c| tree.text_of(c))
                .filter(|text| !text.trim().is_empty())
                .collect();
            let content = replies.join("\n\n");

            if char_len(&content) < config.min_discussion_chars {
                tracing::trace!("Thread {:?} too short ({} chars)", title, char_len(&content));
                return None;
            }
            Some(DiscussionRecord::new(title, content, source))
        })
        .collect()
}
