//! URL handling module for the page analyzer
//!
//! This module resolves anchor `href` values against the analyzed page and
//! classifies the result as internal or external.

mod resolve;

// Re-export main functions
pub use resolve::{is_followable_href, normalize_page_url, resolve_href};

/// Whether a resolved link stays on the analyzed page's URL space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Resolved URL starts with the page URL
    Internal,
    /// Anything else
    External,
}

impl LinkScope {
    /// Returns true for internal links
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Classifies a resolved link against the URL of the page it was found on
///
/// The comparison is a plain string prefix test against the page URL in the
/// same serialized form `resolve_href` produces (lowercased scheme and host,
/// default port dropped). A page URL that does not parse is used as-is. A page
/// at `https://a.test/blog` therefore also claims `https://a.test/blog2` as
/// internal.
///
/// # Examples
///
/// ```
/// use page_analyzer::url::{classify_link, LinkScope};
///
/// assert_eq!(
///     classify_link("https://a.test/", "https://a.test/docs"),
///     LinkScope::Internal
/// );
/// assert_eq!(
///     classify_link("https://a.test/", "https://b.test/"),
///     LinkScope::External
/// );
/// ```
pub fn classify_link(page_url: &str, resolved: &str) -> LinkScope {
    let prefix = normalize_page_url(page_url);
    if resolved.starts_with(prefix.as_ref()) {
        LinkScope::Internal
    } else {
        LinkScope::External
    }
}
