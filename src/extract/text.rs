//! Text cleanup helpers shared by the extraction rules

/// Collapses all runs of whitespace to single spaces and trims the ends
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters (not bytes)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Removes a leading FAQ label such as `Q:`, `Q.`, `Question:`, `A:` or `Answer:`
pub fn strip_label(text: &str) -> &str {
    const LABELS: [&str; 6] = ["question:", "answer:", "q:", "a:", "q.", "a."];

    let trimmed = text.trim_start();
    for label in LABELS {
        if trimmed.len() > label.len()
            && trimmed.is_char_boundary(label.len())
            && trimmed[..label.len()].eq_ignore_ascii_case(label)
        {
            let rest = &trimmed[label.len()..];
            // "A. Smith wrote..." must stay intact: a label is followed by whitespace
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    trimmed
}
