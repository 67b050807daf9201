//! Discussion-to-Q&A conversion
//!
//! Enabled with `extraction.convert-discussions`; every discussion that
//! survives extraction also yields one question/answer pair.

use super::records::{DiscussionRecord, QARecord};
use super::text::char_len;
use regex::Regex;
use std::sync::OnceLock;

const MIN_TITLE_CHARS: usize = 5;
const MIN_CONTENT_CHARS: usize = 20;
const MAX_ANSWER_CHARS: usize = 1000;
const MAX_ANSWER_SENTENCES: usize = 5;

fn sentence_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+(\s+|$)").expect("sentence pattern is valid"))
}

/// Splits text into sentences, keeping the terminating punctuation
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in sentence_end().find_iter(text) {
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            out.push(sentence);
        }
        start = m.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

/// Turns a discussion into a question/answer pair
///
/// # Returns
///
/// * `Some(QARecord)` - question taken from the title, the first question in
///   the content, or a generic prompt about the title
/// * `None` - title or content too short to be useful
pub fn discussion_to_qa(discussion: &DiscussionRecord) -> Option<QARecord> {
    let title = discussion.title.trim();
    let content = discussion.content.trim();
    if char_len(title) < MIN_TITLE_CHARS || char_len(content) < MIN_CONTENT_CHARS {
        return None;
    }

    let content_sentences = sentences(content);

    let question = if title.ends_with('?') {
        title.to_string()
    } else if let Some(q) = content_sentences.iter().find(|s| s.ends_with('?')) {
        q.to_string()
    } else {
        format!("What information can you provide about {}?", title)
    };

    let answer = if char_len(content) > MAX_ANSWER_CHARS {
        content_sentences
            .iter()
            .take(MAX_ANSWER_SENTENCES)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        content.to_string()
    };

    QARecord::new(question, answer, discussion.source.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discussion(title: &str, content: &str) -> DiscussionRecord {
        DiscussionRecord::new(title, content, "https://example.com/t/1")
    }

    #[test]
    fn test_sentences() {
        assert_eq!(
            sentences("First one. Second one? Third!  Trailing"),
            vec!["First one.", "Second one?", "Third!", "Trailing"]
        );
        assert_eq!(sentences("version 1.2 is out."), vec!["version 1.2 is out."]);
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn test_title_question_used() {
        let qa = discussion_to_qa(&discussion(
            "How do lifetimes work?",
            "They describe how long references are valid.",
        ))
        .unwrap();
        assert_eq!(qa.question, "How do lifetimes work?");
        assert_eq!(qa.answer, "They describe how long references are valid.");
        assert_eq!(qa.source, "https://example.com/t/1");
    }

    #[test]
    fn test_question_from_content() {
        let qa = discussion_to_qa(&discussion(
            "Borrow checker trouble",
            "I keep getting E0502. Why does this happen? Any ideas welcome.",
        ))
        .unwrap();
        assert_eq!(qa.question, "Why does this happen?");
    }

    #[test]
    fn test_generic_question() {
        let qa = discussion_to_qa(&discussion(
            "Release notes",
            "Version two ships with faster builds and a new formatter.",
        ))
        .unwrap();
        assert_eq!(qa.question, "What information can you provide about Release notes?");
    }

    #[test]
    fn test_too_short_skipped() {
        assert!(discussion_to_qa(&discussion("Hi", "Long enough content for an answer.")).is_none());
        assert!(discussion_to_qa(&discussion("A real title", "short")).is_none());
    }

    #[test]
    fn test_long_answer_truncated() {
        let sentence = "This sentence is padding for a long discussion body. ";
        let content = sentence.repeat(30);
        let qa = discussion_to_qa(&discussion("Long thread", &content)).unwrap();
        assert_eq!(sentences(&qa.answer).len(), 5);
        assert!(char_len(&qa.answer) < 1000);
    }
}
