use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};
use url::Url;

/// A URL discovered during the crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlTarget {
    /// Normalized absolute URL
    pub url: Url,

    /// Page the URL was found on; `None` for the seed
    pub discovered_from: Option<Url>,

    /// Link distance from the seed
    pub depth: u32,

    /// Position inside a paginated listing, when found through pagination
    pub pagination: Option<u32>,
}

impl CrawlTarget {
    /// The seed of a crawl
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            discovered_from: None,
            depth: 0,
            pagination: None,
        }
    }

    /// A plain link found on `parent`, one level deeper
    pub fn link(url: Url, parent: &CrawlTarget) -> Self {
        Self {
            url,
            discovered_from: Some(parent.url.clone()),
            depth: parent.depth + 1,
            pagination: None,
        }
    }

    /// Another page of the listing `parent` belongs to; stays at the same depth
    pub fn listing_page(url: Url, parent: &CrawlTarget, position: u32) -> Self {
        Self {
            url,
            discovered_from: Some(parent.url.clone()),
            depth: parent.depth,
            pagination: Some(position),
        }
    }
}

/// A target waiting in the frontier
///
/// Ordering: pagination targets come first, by position, then plain links in
/// discovery order. Ties are broken by the enqueue sequence number so the
/// order is total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedTarget {
    pub target: CrawlTarget,
    pub seq: u64,
}

impl QueuedTarget {
    fn sort_key(&self) -> (u8, u32, u64) {
        match self.target.pagination {
            Some(position) => (0, position, self.seq),
            None => (1, 0, self.seq),
        }
    }
}

// BinaryHeap is a max-heap: reverse so the smallest key pops first
impl Ord for QueuedTarget {
    fn cmp(&self, other: &Self) -> Ordering {
        other.sort_key().cmp(&self.sort_key())
    }
}

impl PartialOrd for QueuedTarget {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedTarget {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for QueuedTarget {}

/// Run-wide crawl progress
///
/// Owned by the frontier; serialized to the checkpoint directory after every
/// page so an interrupted run can resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlState {
    /// Normalized seed URL; resume only happens for the same seed
    pub seed: Url,

    /// Every URL ever enqueued (normalized), processed or pending
    pub visited: BTreeSet<String>,

    /// Targets not yet taken off the frontier
    pub pending: BinaryHeap<QueuedTarget>,

    /// Pages taken off the frontier and finished
    pub pages_processed: usize,

    /// User-requested page cap
    pub max_pages: Option<usize>,

    /// Safety ceiling used when no cap is set
    pub page_ceiling: usize,

    /// Maximum link depth, if any
    pub max_depth: Option<u32>,

    /// Next enqueue sequence number
    pub next_seq: u64,

    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CrawlState {
    pub fn new(
        seed: Url,
        max_pages: Option<usize>,
        page_ceiling: usize,
        max_depth: Option<u32>,
    ) -> Self {
        let now = Utc::now();
        Self {
            seed,
            visited: BTreeSet::new(),
            pending: BinaryHeap::new(),
            pages_processed: 0,
            max_pages,
            page_ceiling,
            max_depth,
            next_seq: 0,
            started_at: now,
            updated_at: now,
        }
    }

    /// The page limit in force: the explicit cap, else the safety ceiling
    pub fn page_limit(&self) -> usize {
        self.max_pages.unwrap_or(self.page_ceiling)
    }

    pub fn limit_reached(&self) -> bool {
        self.pages_processed >= self.page_limit()
    }
}
