//! Job lifecycle scenarios: submit, run, re-run, delete

use crate::{create_test_config, mount_head, mount_page};
use page_analyzer::jobs::{AnalysisService, SubmitOutcome};
use page_analyzer::output::load_statistics;
use page_analyzer::storage::open_storage;
use page_analyzer::{AnalyzerError, JobStatus, JobStore};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LINKED_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Linked</title></head><body>
  <h2>Links</h2>
  <a href="/ok">ok</a>
  <a href="/gone">gone</a>
</body></html>"#;

async fn linked_site() -> MockServer {
    let site = MockServer::start().await;
    mount_page(&site, "/", LINKED_PAGE).await;
    mount_head(&site, "/ok", 200).await;
    mount_head(&site, "/gone", 410).await;
    site
}

#[tokio::test]
async fn test_submit_runs_job_to_done() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let site = linked_site().await;
    let page_url = format!("{}/", site.uri());

    let service = AnalysisService::from_config(&config).expect("Failed to start service");
    let store = service.store();

    let outcome = service.submit(&page_url).await.unwrap();
    assert!(outcome.is_created());
    assert_eq!(outcome.job().status, JobStatus::Queued);
    let id = outcome.job().id;

    service.shutdown().await;

    let job = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Done);
    assert!(job.error_message.is_none());

    let metrics = job.metrics.expect("Done job should carry metrics");
    assert_eq!(metrics.page_title, "Linked");
    assert_eq!(metrics.headings.h2, 1);
    assert_eq!(metrics.internal_links, 2);
    assert_eq!(metrics.external_links, 0);
    assert_eq!(metrics.inaccessible_links, 1);
    assert_eq!(metrics.broken_links[0].url, format!("{}/gone", site.uri()));
    assert_eq!(metrics.broken_links[0].status_code, 410);
}

#[tokio::test]
async fn test_results_survive_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let site = linked_site().await;

    let service = AnalysisService::from_config(&config).unwrap();
    let id = service
        .submit(&format!("{}/", site.uri()))
        .await
        .unwrap()
        .job()
        .id;
    service.shutdown().await;

    let reopened = AnalysisService::from_config(&config).unwrap();
    let job = reopened.get(id).unwrap();
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.metrics.unwrap().broken_links.len(), 1);
    reopened.shutdown().await;
}

#[tokio::test]
async fn test_failed_fetch_marks_job_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    let service = AnalysisService::from_config(&config).unwrap();
    let store = service.store();
    let id = service
        .submit(&format!("{}/", site.uri()))
        .await
        .unwrap()
        .job()
        .id;
    service.shutdown().await;

    let job = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Error);
    let message = job.error_message.expect("Error job should carry a message");
    assert!(!message.is_empty());
    assert!(message.contains("500"));
    assert!(job.metrics.is_none());
}

#[tokio::test]
async fn test_duplicate_submit_returns_existing_job() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let site = linked_site().await;
    let page_url = format!("{}/", site.uri());

    let service = AnalysisService::from_config(&config).unwrap();
    let first = service.submit(&page_url).await.unwrap();
    let second = service.submit(&page_url).await.unwrap();

    assert!(first.is_created());
    assert!(matches!(second, SubmitOutcome::Existing(_)));
    assert_eq!(first.job().id, second.job().id);
    assert_eq!(service.list().unwrap().len(), 1);

    service.shutdown().await;
}

#[tokio::test]
async fn test_rerun_done_job() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let site = linked_site().await;

    let service = AnalysisService::from_config(&config).unwrap();
    let id = service
        .submit(&format!("{}/", site.uri()))
        .await
        .unwrap()
        .job()
        .id;
    service.shutdown().await;

    let service = AnalysisService::from_config(&config).unwrap();
    let store = service.store();
    assert_eq!(service.get(id).unwrap().status, JobStatus::Done);

    let summary = service.rerun(&[id, 777]).await.unwrap();
    assert_eq!(summary.requeued, vec![id]);
    assert_eq!(summary.skipped, vec![777]);
    service.shutdown().await;

    let job = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Done);
    assert!(job.error_message.is_none());
    assert_eq!(job.metrics.unwrap().internal_links, 2);
}

#[tokio::test]
async fn test_rerun_errored_job_until_done() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let site = MockServer::start().await;

    // First fetch fails, later fetches succeed
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&site)
        .await;
    mount_page(&site, "/", LINKED_PAGE).await;
    mount_head(&site, "/ok", 200).await;
    mount_head(&site, "/gone", 410).await;

    let service = AnalysisService::from_config(&config).unwrap();
    let store = service.store();
    let id = service
        .submit(&format!("{}/", site.uri()))
        .await
        .unwrap()
        .job()
        .id;
    service.shutdown().await;

    let failed = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(failed.status, JobStatus::Error);
    assert!(failed.error_message.unwrap().contains("503"));

    let service = AnalysisService::from_config(&config).unwrap();
    let summary = service.rerun(&[id]).await.unwrap();
    assert_eq!(summary.requeued, vec![id]);
    service.shutdown().await;

    let done = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(done.status, JobStatus::Done);
    assert!(done.error_message.is_none());
    let metrics = done.metrics.expect("Done job should carry metrics");
    assert_eq!(metrics.internal_links, 2);
    assert_eq!(metrics.inaccessible_links, 1);
}

#[tokio::test]
async fn test_rerun_running_job_is_noop() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);

    let storage = open_storage(Path::new(&config.storage.database_path)).unwrap();
    let job = storage.create("https://running.test/").unwrap();
    storage
        .try_transition(job.id, JobStatus::Queued, JobStatus::Running)
        .unwrap();
    drop(storage);

    let service = AnalysisService::from_config(&config).unwrap();
    let summary = service.rerun(&[job.id]).await.unwrap();
    assert!(summary.requeued.is_empty());
    assert_eq!(summary.skipped, vec![job.id]);
    assert_eq!(service.get(job.id).unwrap().status, JobStatus::Running);
    service.shutdown().await;
}

#[tokio::test]
async fn test_delete_and_statistics() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let site = linked_site().await;
    mount_page(&site, "/plain", "<html><body>plain</body></html>").await;

    let service = AnalysisService::from_config(&config).unwrap();
    let a = service.submit(&format!("{}/", site.uri())).await.unwrap();
    let b = service
        .submit(&format!("{}/plain", site.uri()))
        .await
        .unwrap();
    let store = service.store();
    service.shutdown().await;

    let stats = load_statistics(store.as_ref()).unwrap();
    assert_eq!(stats.total_jobs, 2);
    assert_eq!(stats.count(JobStatus::Done), 2);
    assert_eq!(stats.total_internal_links, 2);
    assert_eq!(stats.total_broken_links, 1);

    let service = AnalysisService::from_config(&config).unwrap();
    assert_eq!(service.delete(&[a.job().id, 9999]).unwrap(), 1);
    assert!(matches!(
        service.get(a.job().id),
        Err(AnalyzerError::JobNotFound(_))
    ));
    assert_eq!(service.get(b.job().id).unwrap().status, JobStatus::Done);
    assert_eq!(service.statistics().unwrap().total_jobs, 1);
    service.shutdown().await;
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);

    let service = AnalysisService::from_config(&config).unwrap();
    let result = service.submit("file:///etc/passwd").await;
    assert!(matches!(result, Err(AnalyzerError::InvalidUrl { .. })));
    assert!(service.list().unwrap().is_empty());
    service.shutdown().await;
}
