//! Crawler module for single-page analysis
//!
//! This module contains the page analysis engine, including:
//! - HTTP fetching of the analyzed page and HEAD probes for its links
//! - HTML analysis (doctype, title, headings, anchors, login forms)
//! - Concurrent link validation with fan-out/fan-in aggregation
//! - The crawl executor that assembles a `CrawlResult`

mod executor;
mod fetcher;
mod parser;
mod result;
mod validator;

pub use executor::CrawlExecutor;
pub use fetcher::{build_http_client, fetch_page, probe_link, ProbeOutcome};
pub use parser::{analyze_html, AnalyzedLink, PageAnalysis};
pub use result::{BrokenLink, CrawlResult, HeadingCounts, HtmlVersion};
pub use validator::{LinkValidator, ValidationReport};
