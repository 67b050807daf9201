//! HTML parser producing a queryable document
//!
//! This module handles parsing fetched HTML into:
//! - Links to follow (absolute, with anchor text and `rel` values)
//! - Text queries by CSS selector
//! - The generic block tree consumed by the extractor
//!
//! Parsing is permissive: malformed markup never fails, it yields whatever
//! tree html5ever recovers.

use crate::extract::{clean_text, Block, BlockKind, BlockTree};
use crate::HarvestError;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements whose content is never page text
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "nav", "footer", "svg", "iframe",
    "select", "option", "textarea", "input",
];

/// Elements that are always a single text block
const LEAF_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "pre", "summary", "caption", "figcaption",
    "button",
];

/// Elements that become a container when they hold other blocks, else a text block
const FLOW_TAGS: &[&str] = &[
    "div", "section", "article", "main", "aside", "header", "body", "li", "ul", "ol", "dl",
    "dt", "dd", "blockquote", "details", "table", "thead", "tbody", "tfoot", "tr", "td",
    "th", "figure", "form", "fieldset", "address",
];

/// A hyperlink found on a page
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Absolute URL
    pub url: Url,
    /// Anchor text, whitespace-collapsed
    pub text: String,
    /// Lowercased `rel` tokens
    pub rel: Vec<String>,
}

impl Link {
    pub fn has_rel(&self, value: &str) -> bool {
        self.rel.iter().any(|r| r == value)
    }
}

/// A parsed page
///
/// Wraps a `scraper::Html`, which is not `Send`: build it, query it and drop
/// it without crossing an `.await`.
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    /// Parses HTML content fetched from `url`
    ///
    /// # Arguments
    ///
    /// * `content` - The HTML content to parse
    /// * `url` - The page URL, used as base for relative links
    ///
    /// # Example
    ///
    /// ```no_run
    /// use qa_harvest::crawler::Document;
    /// use url::Url;
    ///
    /// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
    /// let url = Url::parse("https://example.com/").unwrap();
    /// let document = Document::parse(html, &url);
    /// assert_eq!(document.title(), Some("Test".to_string()));
    /// ```
    pub fn parse(content: &str, url: &Url) -> Self {
        Self {
            url: url.clone(),
            html: Html::parse_document(content),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The page title (from the `<title>` tag)
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|element| clean_text(&element.text().collect::<String>()))
            .filter(|s| !s.is_empty())
    }

    /// All followable links on the page
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `<a href="...">` tags anywhere in the document
    /// - `<link rel="next" href="...">` and `<link rel="prev" href="...">`
    ///
    /// **Exclude:**
    /// - `<a href="..." download>`
    /// - `javascript:`, `mailto:`, `tel:` links and data URIs
    /// - Fragment-only links
    /// - Non-HTTP(S) URLs after resolution
    pub fn links(&self) -> Vec<Link> {
        let mut links = self.select_links("a[href]").unwrap_or_default();

        if let Ok(extra) = self.select_links("link[rel][href]") {
            links.extend(
                extra
                    .into_iter()
                    .filter(|l| l.has_rel("next") || l.has_rel("prev")),
            );
        }

        links
    }

    /// Links of all elements matching `selector`
    pub fn select_links(&self, selector: &str) -> Result<Vec<Link>, HarvestError> {
        let selector = parse_selector(selector)?;
        let links = self
            .html
            .select(&selector)
            .filter(|element| element.value().attr("download").is_none())
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                let url = resolve_link(href, &self.url)?;
                let rel = element
                    .value()
                    .attr("rel")
                    .map(|r| r.split_whitespace().map(str::to_lowercase).collect())
                    .unwrap_or_default();
                Some(Link {
                    url,
                    text: clean_text(&element.text().collect::<String>()),
                    rel,
                })
            })
            .collect();
        Ok(links)
    }

    /// Cleaned text of every element matching `selector`, empty ones dropped
    pub fn select_text(&self, selector: &str) -> Result<Vec<String>, HarvestError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect())
    }

    /// Cleaned text of the whole body
    pub fn text_content(&self) -> String {
        text_of(self.body())
    }

    /// Flattens the page into blocks for the extractor
    pub fn block_tree(&self) -> BlockTree {
        let mut tree = BlockTree::new();
        walk_children(self.body(), None, 0, &mut tree);
        tree
    }

    fn body(&self) -> ElementRef<'_> {
        Selector::parse("body")
            .ok()
            .and_then(|s| self.html.select(&s).next())
            .unwrap_or_else(|| self.html.root_element())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Text of an element, skipping script-like descendants
fn text_of(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    clean_text(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) if e.name() == "br" => out.push(' '),
            Node::Element(e) if SKIPPED_TAGS.contains(&e.name()) => {}
            Node::Element(e) => {
                let is_block = is_block_tag(e.name());
                if let Some(child) = ElementRef::wrap(child) {
                    if is_block {
                        out.push(' ');
                    }
                    collect_text(child, out);
                    if is_block {
                        out.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_block_tag(name: &str) -> bool {
    LEAF_TAGS.contains(&name) || FLOW_TAGS.contains(&name)
}

fn has_block_descendant(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| is_block_tag(e.value().name()))
}

fn leaf_kind(tag: &str) -> BlockKind {
    match tag {
        "h1" => BlockKind::Heading(1),
        "h2" => BlockKind::Heading(2),
        "h3" => BlockKind::Heading(3),
        "h4" => BlockKind::Heading(4),
        "h5" => BlockKind::Heading(5),
        "h6" => BlockKind::Heading(6),
        "summary" => BlockKind::Summary,
        "pre" => BlockKind::Preformatted,
        "li" => BlockKind::ListItem,
        // Accordion toggles label the panel after them, like <dt>
        "dt" | "button" => BlockKind::Term,
        "dd" => BlockKind::Definition,
        _ => BlockKind::Paragraph,
    }
}

/// Emits blocks for the children of `element`
///
/// Runs of inline content between block children become paragraph blocks.
fn walk_children(element: ElementRef<'_>, parent: Option<usize>, depth: u32, tree: &mut BlockTree) {
    let mut inline = String::new();

    for child in element.children() {
        match child.value() {
            Node::Text(text) => inline.push_str(text),
            Node::Element(e) => {
                let name = e.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let Some(child) = ElementRef::wrap(child) else { continue };

                if is_block_tag(name) {
                    flush_inline(&mut inline, parent, depth, tree);
                    visit_block(child, parent, depth, tree);
                } else if name == "br" {
                    inline.push(' ');
                } else if has_block_descendant(child) {
                    // Inline wrapper around blocks, e.g. <a><div>..</div></a>
                    flush_inline(&mut inline, parent, depth, tree);
                    walk_children(child, parent, depth, tree);
                } else {
                    collect_text(child, &mut inline);
                }
            }
            _ => {}
        }
    }

    flush_inline(&mut inline, parent, depth, tree);
}

fn flush_inline(inline: &mut String, parent: Option<usize>, depth: u32, tree: &mut BlockTree) {
    let text = clean_text(inline);
    inline.clear();
    if !text.is_empty() {
        tree.push(Block::leaf(BlockKind::Paragraph, "#text", text, parent, depth));
    }
}

fn visit_block(element: ElementRef<'_>, parent: Option<usize>, depth: u32, tree: &mut BlockTree) {
    let tag = element.value().name();

    if LEAF_TAGS.contains(&tag) || !has_block_descendant(element) {
        let text = text_of(element);
        if !text.is_empty() {
            tree.push(Block::leaf(leaf_kind(tag), tag, text, parent, depth));
        }
        return;
    }

    let index = tree.push(Block::container(tag, parent, depth));
    walk_children(element, Some(index), depth + 1, tree);
    tree.pop_empty_container(index);
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then_some(absolute)
}
