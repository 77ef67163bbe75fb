//! HTML analyzer for structural page metrics
//!
//! This module turns a fetched document into:
//! - An inferred HTML version (from the document's first node)
//! - The page title
//! - Heading counts per level
//! - Classified outbound links (from `<a href>` tags)
//! - Login form presence (any password input)
//!
//! Everything here is synchronous and free of I/O. The parsed `Html` never
//! escapes `analyze_html`, so callers can hold the result across `.await`.

use crate::crawler::result::{HeadingCounts, HtmlVersion};
use crate::url::{classify_link, is_followable_href, resolve_href, LinkScope};
use scraper::node::Node;
use scraper::{Html, Selector};

/// One anchor target, resolved and classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedLink {
    /// Absolute URL, or the raw href when it could not be resolved
    pub url: String,
    pub scope: LinkScope,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub html_version: HtmlVersion,

    /// Text of the first `<title>`, empty when there is none
    pub page_title: String,

    pub headings: HeadingCounts,

    /// One entry per qualifying anchor, in document order (not deduplicated)
    pub links: Vec<AnalyzedLink>,

    pub has_login_form: bool,
}

impl PageAnalysis {
    /// Number of links classified as internal
    pub fn internal_links(&self) -> u32 {
        self.links.iter().filter(|l| l.scope.is_internal()).count() as u32
    }

    /// Number of links classified as external
    pub fn external_links(&self) -> u32 {
        self.links.iter().filter(|l| !l.scope.is_internal()).count() as u32
    }
}

/// Parses HTML content and extracts page metrics
///
/// # Link Extraction Rules
///
/// **Include:** every `<a>` with an `href` attribute, resolved against
/// `page_url`. Duplicate targets are counted once per anchor.
///
/// **Exclude:** empty hrefs, fragment-only hrefs (`#...`) and `javascript:`
/// links. Excluded anchors are neither counted nor probed.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the document was fetched from, as submitted
///
/// # Example
///
/// ```
/// use page_analyzer::crawler::analyze_html;
/// use page_analyzer::HtmlVersion;
///
/// let html = r#"<!DOCTYPE html><html><head><title>Test</title></head>
///     <body><h1>Hi</h1><a href="/page">Link</a></body></html>"#;
/// let analysis = analyze_html(html, "https://example.com/");
/// assert_eq!(analysis.html_version, HtmlVersion::Html5);
/// assert_eq!(analysis.page_title, "Test");
/// assert_eq!(analysis.internal_links(), 1);
/// ```
pub fn analyze_html(html: &str, page_url: &str) -> PageAnalysis {
    let document = Html::parse_document(html);

    PageAnalysis {
        html_version: detect_html_version(&document),
        page_title: extract_title(&document),
        headings: count_headings(&document),
        links: extract_links(&document, page_url),
        has_login_form: has_password_input(&document),
    }
}

/// Infers the HTML version from the document's first child node
fn detect_html_version(document: &Html) -> HtmlVersion {
    let declaration = document
        .tree
        .root()
        .first_child()
        .map(|node| node_text(node.value()))
        .unwrap_or_default();

    HtmlVersion::from_declaration(&declaration)
}

/// Textual form of a node, as used by the version heuristic
///
/// A doctype is rebuilt as `name PUBLIC "public-id" "system-id"`.
fn node_text(node: &Node) -> String {
    match node {
        Node::Doctype(doctype) => {
            let mut text = doctype.name().to_string();
            if !doctype.public_id().is_empty() {
                text.push_str(&format!(" PUBLIC \"{}\"", doctype.public_id()));
                if !doctype.system_id().is_empty() {
                    text.push_str(&format!(" \"{}\"", doctype.system_id()));
                }
            } else if !doctype.system_id().is_empty() {
                text.push_str(&format!(" SYSTEM \"{}\"", doctype.system_id()));
            }
            text
        }
        Node::Element(element) => element.name().to_string(),
        Node::Comment(comment) => comment.comment.to_string(),
        Node::Text(text) => text.text.to_string(),
        _ => String::new(),
    }
}

/// Extracts the text of the first `<title>` element, whitespace included
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}

/// Counts `h1`..`h6` independently; nested headings are counted too
fn count_headings(document: &Html) -> HeadingCounts {
    let count = |tag: &str| -> u32 {
        Selector::parse(tag)
            .map(|selector| document.select(&selector).count() as u32)
            .unwrap_or(0)
    };

    HeadingCounts {
        h1: count("h1"),
        h2: count("h2"),
        h3: count("h3"),
        h4: count("h4"),
        h5: count("h5"),
        h6: count("h6"),
    }
}

/// Resolves and classifies every qualifying anchor
fn extract_links(document: &Html, page_url: &str) -> Vec<AnalyzedLink> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if !is_followable_href(href) {
                continue;
            }

            let url = resolve_href(page_url, href);
            let scope = classify_link(page_url, &url);
            links.push(AnalyzedLink { url, scope });
        }
    }

    links
}

/// Returns true if any `<input>` has `type="password"` (case-insensitive)
fn has_password_input(document: &Html) -> bool {
    let Ok(input_selector) = Selector::parse("input[type]") else {
        return false;
    };

    document.select(&input_selector).any(|element| {
        element
            .value()
            .attr("type")
            .map(|kind| kind.trim().eq_ignore_ascii_case("password"))
            .unwrap_or(false)
    })
}
