//! Pagination discovery
//!
//! Looks at the links of one page for signs that it belongs to a paged
//! listing. An explicit "next" link wins; otherwise a set of numbered page
//! links sharing one URL template is expanded to the full page range.

use super::parser::Link;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use url::Url;

/// Query parameters that commonly carry a page index
const PAGE_PARAMS: &[&str] = &["page", "p", "pg", "paged"];

/// Anchor texts of "next page" links, compared lowercase and trimmed
const NEXT_TEXTS: &[&str] = &["next", "next page", "next »", "next ›", "›", "»", ">", ">>"];

/// Marks the page index inside a URL template
const PLACEHOLDER: &str = "qaharvestpageindex";

fn page_path_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(.*/page/)(\d{1,6})(/.*)?$").expect("page path pattern is valid")
    })
}

fn trailing_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*/)(\d{1,6})/?$").expect("trailing number pattern is valid"))
}

/// Pagination signal found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// Explicit next link, with the position it gets in the listing
    Next { url: Url, position: u32 },
    /// Every page of a numbered listing, by index
    Numbered(Vec<(u32, Url)>),
    /// No pagination: the page is a listing of one
    Single,
}

impl Pagination {
    /// Number of targets this signal produces
    pub fn len(&self) -> usize {
        match self {
            Self::Next { .. } => 1,
            Self::Numbered(pages) => pages.len(),
            Self::Single => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A page URL split into a template and an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndex {
    pub template: String,
    pub index: u32,
}

impl PageIndex {
    /// The URL of page `index` of this template
    pub fn url_for(&self, index: u32) -> Option<Url> {
        Url::parse(&self.template.replace(PLACEHOLDER, &index.to_string())).ok()
    }
}

/// Splits a URL into template and page index
///
/// Tries, in order, a page query parameter, a `/page/N` path pair and, when
/// `allow_trailing` is set, a trailing integer path segment.
pub fn page_index(url: &Url, allow_trailing: bool) -> Option<PageIndex> {
    let mut base = url.clone();
    base.set_fragment(None);

    let pairs: Vec<(String, String)> = base.query_pairs().into_owned().collect();
    for (at, (key, value)) in pairs.iter().enumerate() {
        if !PAGE_PARAMS.contains(&key.to_ascii_lowercase().as_str()) {
            continue;
        }
        let Ok(index) = value.parse::<u32>() else { continue };

        let mut template = base.clone();
        template.query_pairs_mut().clear().extend_pairs(pairs.iter().enumerate().map(
            |(i, (k, v))| {
                if i == at {
                    (k.as_str(), PLACEHOLDER)
                } else {
                    (k.as_str(), v.as_str())
                }
            },
        ));
        return Some(PageIndex {
            template: template.to_string(),
            index,
        });
    }

    let path = base.path().to_string();
    let replaced = if let Some(caps) = page_path_pattern().captures(&path) {
        let post = caps.get(3).map_or("", |m| m.as_str());
        Some((format!("{}{}{}", &caps[1], PLACEHOLDER, post), caps[2].parse::<u32>().ok()?))
    } else if allow_trailing {
        trailing_number_pattern()
            .captures(&path)
            .and_then(|caps| Some((format!("{}{}", &caps[1], PLACEHOLDER), caps[2].parse().ok()?)))
    } else {
        None
    };

    let (template_path, index) = replaced?;
    let mut template = base;
    template.set_path(&template_path);
    Some(PageIndex {
        template: template.to_string(),
        index,
    })
}

fn is_next_link(link: &Link) -> bool {
    let text = link.text.trim().to_lowercase();
    link.has_rel("next") || NEXT_TEXTS.contains(&text.as_str())
}

/// Index of a link in a numbered pager
///
/// Trailing-number URLs only count when the anchor text is the number
/// itself; otherwise any `/questions/12345` link would look like a page.
fn link_page_index(link: &Link) -> Option<PageIndex> {
    let numeric_text = !link.text.is_empty() && link.text.trim().chars().all(|c| c.is_ascii_digit());
    page_index(&link.url, numeric_text)
}

/// Finds the pagination signal of one page
#[derive(Debug, Clone)]
pub struct PaginationDiscoverer {
    max_pages: u32,
}

impl PaginationDiscoverer {
    /// # Arguments
    ///
    /// * `max_pages` - Cap on synthesized pages for one numbered listing
    pub fn new(max_pages: u32) -> Self {
        Self { max_pages }
    }

    /// Inspects the links of `page`
    ///
    /// # Arguments
    ///
    /// * `page` - URL of the page the links come from
    /// * `position` - Pagination position of the page itself, if known
    /// * `links` - Links found on the page
    pub fn discover(&self, page: &Url, position: Option<u32>, links: &[Link]) -> Pagination {
        let current = page_index(page, true);

        if let Some(next) = links.iter().find(|l| is_next_link(l) && !same_page(&l.url, page)) {
            let from_url = page_index(&next.url, true)
                .filter(|pi| current.as_ref().map_or(true, |c| c.template == pi.template))
                .map(|pi| pi.index);
            let fallback = position.or(current.as_ref().map(|c| c.index)).unwrap_or(1) + 1;
            return Pagination::Next {
                url: next.url.clone(),
                position: from_url.unwrap_or(fallback),
            };
        }

        // (template, indices) in first-seen order
        let mut groups: Vec<(PageIndex, BTreeSet<u32>)> = Vec::new();
        for pi in links.iter().filter_map(link_page_index) {
            match groups.iter_mut().find(|(t, _)| t.template == pi.template) {
                Some((_, indices)) => {
                    indices.insert(pi.index);
                }
                None => {
                    let index = pi.index;
                    groups.push((pi, BTreeSet::from([index])));
                }
            }
        }

        if let Some(current) = &current {
            if let Some((_, indices)) = groups.iter_mut().find(|(t, _)| t.template == current.template) {
                indices.insert(current.index);
            }
        }

        let is_current = |template: &PageIndex| {
            current.as_ref().is_some_and(|c| c.template == template.template)
        };

        // Most indices wins; ties go to the current page's template, then the first seen
        let mut best: Option<&(PageIndex, BTreeSet<u32>)> = None;
        for group in &groups {
            best = match best {
                None => Some(group),
                Some(b) if group.1.len() > b.1.len() => Some(group),
                Some(b) if group.1.len() == b.1.len() && is_current(&group.0) && !is_current(&b.0) => {
                    Some(group)
                }
                Some(b) => Some(b),
            };
        }

        let Some((template, indices)) = best else {
            return Pagination::Single;
        };
        let max = indices.last().copied().unwrap_or(0);
        if max < 2 {
            return Pagination::Single;
        }

        let start = if indices.contains(&0) { 0 } else { 1 };
        let pages: Vec<(u32, Url)> = (start..=max)
            .take(self.max_pages as usize)
            .filter_map(|i| template.url_for(i).map(|url| (i, url)))
            .collect();

        tracing::debug!(
            "Numbered listing on {}: pages {}..={} ({} targets)",
            page,
            start,
            max,
            pages.len()
        );

        if pages.is_empty() {
            Pagination::Single
        } else {
            Pagination::Numbered(pages)
        }
    }
}

fn same_page(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}
