//! Anchor `href` resolution
//!
//! Resolution never fails: when either the page URL or the href cannot be
//! parsed, the raw href text is used as the link target.

use std::borrow::Cow;
use url::Url;

/// Returns true if an anchor with this `href` takes part in link analysis
///
/// Empty hrefs, fragment-only hrefs (`#...`) and `javascript:` pseudo-links
/// are skipped entirely. The value is checked as written, without trimming.
pub fn is_followable_href(href: &str) -> bool {
    !(href.is_empty() || href.starts_with('#') || href.starts_with("javascript:"))
}

/// Resolves an `href` against the URL of the page it appears on
///
/// Absolute hrefs come back normalized by the URL parser, scheme-relative and
/// path-relative hrefs are resolved against the page's scheme, host and path.
///
/// # Examples
///
/// ```
/// use page_analyzer::url::resolve_href;
///
/// assert_eq!(resolve_href("https://a.test/docs/", "../x"), "https://a.test/x");
/// assert_eq!(resolve_href("not a url", "/x"), "/x");
/// ```
pub fn resolve_href(page_url: &str, href: &str) -> String {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot parse page URL {}: {}", page_url, e);
            return href.to_string();
        }
    };

    match base.join(href) {
        Ok(absolute) => absolute.to_string(),
        Err(e) => {
            tracing::debug!("Keeping unresolvable href {:?} as-is: {}", href, e);
            href.to_string()
        }
    }
}

/// Serializes a page URL the way resolved links are serialized
///
/// Returns the input unchanged when it does not parse.
pub fn normalize_page_url(page_url: &str) -> Cow<'_, str> {
    match Url::parse(page_url) {
        Ok(url) => Cow::Owned(url.to_string()),
        Err(_) => Cow::Borrowed(page_url),
    }
}
