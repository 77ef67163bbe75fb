//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during an analysis:
//! - Building the shared HTTP client from configuration
//! - GET requests for the analyzed page (only `200 OK` is accepted)
//! - HEAD requests probing each outbound link
//!
//! Nothing here retries. Redirects follow the reqwest default policy.

use crate::config::HttpConfig;
use crate::AnalyzerError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Outcome of a HEAD probe against one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Server answered with a status below 400
    Reachable { status_code: u16 },

    /// Server answered with a status of 400 or above
    HttpError { status_code: u16 },

    /// No response (DNS failure, connection refused, timeout, TLS error)
    TransportError { error: String },
}

impl ProbeOutcome {
    /// Status code recorded for a broken link, `0` when nothing answered
    pub fn broken_status_code(&self) -> Option<u16> {
        match self {
            Self::Reachable { .. } => None,
            Self::HttpError { status_code } => Some(*status_code),
            Self::TransportError { .. } => Some(0),
        }
    }
}

/// Builds the HTTP client shared by page fetches and link probes
///
/// # Arguments
///
/// * `config` - The HTTP configuration; unset values keep reqwest defaults
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use page_analyzer::config::HttpConfig;
/// use page_analyzer::crawler::build_http_client;
///
/// let config = HttpConfig {
///     user_agent: Some("page-analyzer/0.1".to_string()),
///     request_timeout_secs: Some(30),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches the page under analysis and returns its body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Transport failure | `AnalyzerError::Fetch` |
/// | Any status other than 200 | `AnalyzerError::UnexpectedStatus` |
/// | Body cannot be read or decoded | `AnalyzerError::HtmlParse` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, AnalyzerError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| AnalyzerError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(AnalyzerError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| AnalyzerError::HtmlParse {
            url: url.to_string(),
            message: format!("failed to read document body: {}", e),
        })
}

/// Sends a HEAD request to check whether a link answers
///
/// Never fails: every error becomes a `ProbeOutcome`.
pub async fn probe_link(client: &Client, url: &str) -> ProbeOutcome {
    match client.head(url).send().await {
        Ok(response) => {
            let status_code = response.status().as_u16();
            if status_code >= 400 {
                ProbeOutcome::HttpError { status_code }
            } else {
                ProbeOutcome::Reachable { status_code }
            }
        }
        Err(e) => ProbeOutcome::TransportError {
            error: e.to_string(),
        },
    }
}
