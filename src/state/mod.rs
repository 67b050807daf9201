//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the per-URL lifecycle (queued, fetching, parsed, failed, processed)
//! - `CrawlTarget`: a discovered URL with its parent, depth and pagination position
//! - `CrawlState`: visited set, pending frontier and counters for one run

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::{CrawlState, CrawlTarget, QueuedTarget};
pub use page_state::PageState;
