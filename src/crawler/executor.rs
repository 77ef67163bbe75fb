//! Crawl executor - single-page analysis orchestration
//!
//! `crawl_url` runs the whole analysis for one page:
//! 1. GET the page (only `200 OK` is accepted)
//! 2. Parse the document and extract metrics and links
//! 3. Probe every classified link concurrently
//! 4. Assemble the `CrawlResult`
//!
//! Only a failure in steps 1-2 fails the crawl. Link probe failures become
//! broken-link entries.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::analyze_html;
use crate::crawler::result::CrawlResult;
use crate::crawler::validator::LinkValidator;
use crate::AnalyzerError;
use reqwest::Client;

/// Runs single-page analyses with an injected HTTP client
#[derive(Debug, Clone)]
pub struct CrawlExecutor {
    client: Client,
    validator: LinkValidator,
}

impl CrawlExecutor {
    /// Creates an executor from a client and a link validator
    pub fn new(client: Client, validator: LinkValidator) -> Self {
        Self { client, validator }
    }

    /// Builds the HTTP client and validator described by the configuration
    pub fn from_config(config: &Config) -> Result<Self, AnalyzerError> {
        let client = build_http_client(&config.http)?;
        let validator = LinkValidator::from_config(client.clone(), &config.analyzer);
        Ok(Self::new(client, validator))
    }

    /// Fetches and analyzes one page
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL; links are classified against this exact string
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Metrics plus the broken links found
    /// * `Err(AnalyzerError)` - The page itself could not be fetched or read
    ///
    /// # Example
    ///
    /// ```no_run
    /// use page_analyzer::config::Config;
    /// use page_analyzer::crawler::CrawlExecutor;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let executor = CrawlExecutor::from_config(&Config::default())?;
    /// let result = executor.crawl_url("https://example.com/").await?;
    /// println!("{} broken links", result.inaccessible_links);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl_url(&self, url: &str) -> Result<CrawlResult, AnalyzerError> {
        tracing::debug!("Fetching {}", url);
        let body = fetch_page(&self.client, url).await?;

        let analysis = analyze_html(&body, url);
        let internal_links = analysis.internal_links();
        let external_links = analysis.external_links();

        tracing::debug!(
            "Analyzed {}: {} internal, {} external links",
            url,
            internal_links,
            external_links
        );

        let targets = analysis.links.into_iter().map(|link| link.url).collect();
        let report = self.validator.validate(targets).await;

        Ok(CrawlResult {
            html_version: analysis.html_version,
            page_title: analysis.page_title,
            headings: analysis.headings,
            internal_links,
            external_links,
            inaccessible_links: report.inaccessible(),
            broken_links: report.broken_links,
            has_login_form: analysis.has_login_form,
        })
    }
}
