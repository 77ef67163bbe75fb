//! Integration tests for the page analyzer
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! crawl executor and the job lifecycle end-to-end.

mod crawl_tests;
mod job_tests;
mod validator_tests;

use page_analyzer::config::Config;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration with small limits and a database inside `dir`
pub fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.analyzer.max_concurrent_jobs = 2;
    config.analyzer.max_concurrent_probes = 4;
    config.http.request_timeout_secs = Some(10);
    config.storage.database_path = dir
        .path()
        .join("analyzer.db")
        .to_string_lossy()
        .into_owned();
    config
}

/// Serves `body` as an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Answers HEAD requests for `route` with `status`
pub async fn mount_head(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
