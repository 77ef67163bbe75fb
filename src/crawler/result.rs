//! Value types produced by a crawl

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document type inferred from the first node of the parsed document
///
/// This is a display label, not a conformant doctype parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HtmlVersion {
    #[serde(rename = "HTML 4.01 or XHTML")]
    Html4OrXhtml,
    #[serde(rename = "HTML5")]
    Html5,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl HtmlVersion {
    /// Classifies the text of the document's first node
    ///
    /// Case-insensitive: `"html public"` wins over a bare `"html"`.
    pub fn from_declaration(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("html public") {
            Self::Html4OrXhtml
        } else if text.contains("html") {
            Self::Html5
        } else {
            Self::Unknown
        }
    }

    /// Human readable label, also used as the database representation
    pub fn label(&self) -> &'static str {
        match self {
            Self::Html4OrXhtml => "HTML 4.01 or XHTML",
            Self::Html5 => "HTML5",
            Self::Unknown => "Unknown",
        }
    }

    /// Parses a label produced by [`HtmlVersion::label`]
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "HTML 4.01 or XHTML" => Some(Self::Html4OrXhtml),
            "HTML5" => Some(Self::Html5),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-level heading element counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
}

/// An outbound link that failed to respond or answered with an HTTP error
///
/// `status_code` is `0` when no response was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLink {
    pub url: String,
    pub status_code: u16,
}

impl BrokenLink {
    /// Returns true when the probe got no response at all
    pub fn is_transport_failure(&self) -> bool {
        self.status_code == 0
    }
}

/// Structural metrics and link health of one analyzed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    pub html_version: HtmlVersion,
    pub page_title: String,
    #[serde(flatten)]
    pub headings: HeadingCounts,
    pub internal_links: u32,
    pub external_links: u32,
    /// Number of entries in `broken_links`
    pub inaccessible_links: u32,
    /// Broken links in the order their probes reported back
    pub broken_links: Vec<BrokenLink>,
    pub has_login_form: bool,
}

impl CrawlResult {
    /// Total classified links (internal + external)
    pub fn total_links(&self) -> u32 {
        self.internal_links + self.external_links
    }
}
