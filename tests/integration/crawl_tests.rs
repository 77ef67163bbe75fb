//! Single-page crawl scenarios against mock servers

use crate::{mount_head, mount_page};
use page_analyzer::config::Config;
use page_analyzer::crawler::{CrawlExecutor, HtmlVersion};
use page_analyzer::{AnalyzerError, BrokenLink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor() -> CrawlExecutor {
    CrawlExecutor::from_config(&Config::default()).expect("Failed to build executor")
}

#[tokio::test]
async fn test_internal_external_and_broken_links() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let page_url = format!("{}/", site.uri());
    let external_url = format!("{}/", other.uri());

    let body = format!(
        r#"<!DOCTYPE html>
        <html><head><title>Home</title></head>
        <body>
          <h1>Welcome</h1>
          <a href="/x">missing</a>
          <a href="{}">elsewhere</a>
        </body></html>"#,
        external_url
    );
    mount_page(&site, "/", &body).await;
    mount_head(&site, "/x", 404).await;
    mount_head(&other, "/", 200).await;

    let result = executor().crawl_url(&page_url).await.unwrap();

    assert_eq!(result.html_version, HtmlVersion::Html5);
    assert_eq!(result.page_title, "Home");
    assert_eq!(result.headings.h1, 1);
    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 1);
    assert_eq!(result.inaccessible_links, 1);
    assert_eq!(
        result.broken_links,
        vec![BrokenLink {
            url: format!("{}/x", site.uri()),
            status_code: 404,
        }]
    );
    assert!(!result.has_login_form);
}

#[tokio::test]
async fn test_every_anchor_is_classified_and_probed() {
    let site = MockServer::start().await;
    let page_url = format!("{}/", site.uri());

    let body = r##"<html><body>
        <a href="/a">a</a>
        <a href="/b">b</a>
        <a href="c">c</a>
        <a href="">empty</a>
        <a href="#top">fragment</a>
        <a href="javascript:void(0)">script</a>
        <a href="http://127.0.0.1:1/">closed port</a>
        <a>no href</a>
    </body></html>"##;
    mount_page(&site, "/", body).await;
    mount_head(&site, "/a", 200).await;
    mount_head(&site, "/b", 301).await;
    mount_head(&site, "/c", 500).await;

    let result = executor().crawl_url(&page_url).await.unwrap();

    assert_eq!(result.internal_links, 3);
    assert_eq!(result.external_links, 1);
    assert_eq!(result.total_links(), 4);

    assert_eq!(result.broken_links.len(), 2);
    assert!(result.broken_links.contains(&BrokenLink {
        url: format!("{}/c", site.uri()),
        status_code: 500,
    }));
    assert!(result.broken_links.contains(&BrokenLink {
        url: "http://127.0.0.1:1/".to_string(),
        status_code: 0,
    }));
    assert_eq!(result.inaccessible_links, 2);
}

#[tokio::test]
async fn test_unnormalized_page_url_keeps_relative_links_internal() {
    let site = MockServer::start().await;
    mount_page(&site, "/Dir/", r#"<html><body><a href="page">p</a></body></html>"#).await;
    mount_head(&site, "/Dir/page", 200).await;

    let page_url = format!("{}/Dir/", site.uri().replacen("http://", "HTTP://", 1));
    let result = executor().crawl_url(&page_url).await.unwrap();

    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 0);
    assert!(result.broken_links.is_empty());
}

#[tokio::test]
async fn test_page_without_links() {
    let site = MockServer::start().await;
    mount_page(&site, "/plain", "<html><body><p>Nothing here</p></body></html>").await;

    let result = executor()
        .crawl_url(&format!("{}/plain", site.uri()))
        .await
        .unwrap();

    assert_eq!(result.internal_links, 0);
    assert_eq!(result.external_links, 0);
    assert_eq!(result.inaccessible_links, 0);
    assert!(result.broken_links.is_empty());
    assert_eq!(result.html_version, HtmlVersion::Html5);
}

#[tokio::test]
async fn test_login_form_detection() {
    let site = MockServer::start().await;
    mount_page(
        &site,
        "/login",
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">
        <html><head><title> Sign in </title></head><body>
          <form><input type="text" name="user"><input type="PASSWORD" name="pass"></form>
        </body></html>"#,
    )
    .await;
    mount_page(
        &site,
        "/search",
        r#"<html><body><form><input type="text" name="q"></form></body></html>"#,
    )
    .await;

    let login = executor()
        .crawl_url(&format!("{}/login", site.uri()))
        .await
        .unwrap();
    assert!(login.has_login_form);
    assert_eq!(login.page_title, " Sign in ");
    assert_eq!(login.html_version, HtmlVersion::Html4OrXhtml);

    let search = executor()
        .crawl_url(&format!("{}/search", site.uri()))
        .await
        .unwrap();
    assert!(!search.has_login_form);
}

#[tokio::test]
async fn test_non_ok_status_fails_crawl() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    let err = executor()
        .crawl_url(&format!("{}/", site.uri()))
        .await
        .unwrap_err();

    match &err {
        AnalyzerError::UnexpectedStatus { status, .. } => assert_eq!(*status, 500),
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_other_success_status_is_rejected() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&site)
        .await;

    let err = executor()
        .crawl_url(&format!("{}/", site.uri()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnalyzerError::UnexpectedStatus { status: 204, .. }
    ));
}

#[tokio::test]
async fn test_unreachable_page_is_fetch_error() {
    let err = executor()
        .crawl_url("http://127.0.0.1:1/")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::Fetch { .. }));
    assert!(err.to_string().starts_with("failed to fetch URL"));
}
