//! Page state definitions for tracking crawl progress
//!
//! Every URL taken off the frontier walks this small state machine once:
//! `Queued → Fetching → {Parsed | FetchFailed} → Processed`, with `Skipped`
//! for URLs refused before any request (robots.txt).
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page is in the frontier waiting to be fetched
    Queued,

    /// Page is currently being fetched
    Fetching,

    /// Page was fetched and parsed into a document
    Parsed,

    // ===== Failure States =====
    /// Fetch failed for good (retries exhausted, non-2xx, not HTML)
    FetchFailed,

    /// Page was never requested (disallowed by robots.txt)
    Skipped,

    // ===== Terminal State =====
    /// Page is done; its records (if any) are checkpointed
    Processed,
}

impl PageState {
    /// Returns true if the state machine permits moving to `to`
    pub fn can_transition_to(&self, to: PageState) -> bool {
        use PageState::*;
        matches!(
            (self, to),
            (Queued, Fetching)
                | (Queued, Skipped)
                | (Fetching, Parsed)
                | (Fetching, FetchFailed)
                | (Parsed, Processed)
                | (FetchFailed, Processed)
                | (Skipped, Processed)
        )
    }

    /// Moves to `to`, or reports the illegal transition
    pub fn transition(self, to: PageState) -> Result<PageState, HarvestError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(HarvestError::InvalidTransition { from: self, to })
        }
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if the page failed or was skipped
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::Skipped)
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::Parsed => "parsed",
            Self::FetchFailed => "fetch_failed",
            Self::Skipped => "skipped",
            Self::Processed => "processed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = PageState::Queued
            .transition(PageState::Fetching)
            .and_then(|s| s.transition(PageState::Parsed))
            .and_then(|s| s.transition(PageState::Processed))
            .unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn test_failure_path() {
        let state = PageState::Queued
            .transition(PageState::Fetching)
            .and_then(|s| s.transition(PageState::FetchFailed))
            .unwrap();
        assert!(state.is_failure());
        assert_eq!(state.transition(PageState::Processed).unwrap(), PageState::Processed);
    }

    #[test]
    fn test_skip_path() {
        let state = PageState::Queued.transition(PageState::Skipped).unwrap();
        assert!(state.is_failure());
        assert!(state.can_transition_to(PageState::Processed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(PageState::Queued.transition(PageState::Parsed).is_err());
        assert!(PageState::Processed.transition(PageState::Queued).is_err());
        assert!(PageState::Parsed.transition(PageState::FetchFailed).is_err());
        assert!(matches!(
            PageState::Fetching.transition(PageState::Processed),
            Err(HarvestError::InvalidTransition {
                from: PageState::Fetching,
                to: PageState::Processed
            })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(PageState::FetchFailed.to_string(), "fetch_failed");
        assert_eq!(format!("{}", PageState::Processed), "processed");
    }
}
