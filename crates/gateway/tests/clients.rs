//! Integration tests for `GatewayClient` and `ProxyApiClient` against an
//! in-process fake backend.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use serde_json::json;
use vidlate_core::error::JobError;
use vidlate_core::job::JobId;
use vidlate_core::proxy::{StatusProxy, SubmissionProxy};
use vidlate_core::status::{JobStatus, StatusSnapshot};
use vidlate_core::upload::{UploadRequest, VideoFile};
use vidlate_gateway::{GatewayClient, ProxyApiClient};

use common::FakeBackend;

fn request() -> UploadRequest {
    let file = VideoFile::new("video.mp4", b"fake mp4 bytes".to_vec()).with_content_type("video/mp4");
    UploadRequest::validated(Some(file), "es").unwrap()
}

fn job_id(raw: &str) -> JobId {
    JobId::parse(raw).unwrap()
}

// ---------------------------------------------------------------------------
// GatewayClient: upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gateway_submit_sends_multipart_fields_and_returns_job_id() {
    let fake = FakeBackend::default();
    let client = GatewayClient::new(common::spawn(fake.clone()).await);

    let id = client.submit(&request()).await.unwrap();
    assert_eq!(id.as_str(), "abc123");

    let uploads = fake.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name.as_deref(), Some("video.mp4"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("video/mp4"));
    assert_eq!(uploads[0].bytes, b"fake mp4 bytes");
    assert_eq!(uploads[0].target_language.as_deref(), Some("es"));
}

#[tokio::test]
async fn gateway_upload_returns_backend_body() {
    let fake = FakeBackend::default();
    let client = GatewayClient::new(common::spawn(fake).await);

    let response = client.upload(&request()).await.unwrap();
    assert_eq!(response.job_id.as_deref(), Some("abc123"));
    assert_eq!(response.message.as_deref(), Some("Processing started"));
}

#[tokio::test]
async fn gateway_submit_non_success_is_upload_failed_with_status() {
    let fake = FakeBackend::default();
    fake.respond_to_upload(
        StatusCode::BAD_REQUEST,
        json!({ "detail": "Only MP4 files are supported" }),
    );
    let client = GatewayClient::new(common::spawn(fake).await);

    let err = client.submit(&request()).await.unwrap_err();
    assert_eq!(err, JobError::UploadFailed("Upload failed with status 400".into()));
}

#[tokio::test]
async fn gateway_submit_without_job_id_is_missing_identifier() {
    let fake = FakeBackend::default();
    fake.respond_to_upload(StatusCode::OK, json!({ "message": "Processing started" }));
    let client = GatewayClient::new(common::spawn(fake).await);

    let err = client.submit(&request()).await.unwrap_err();
    assert_eq!(err, JobError::MissingJobIdentifier);
}

#[tokio::test]
async fn gateway_submit_with_blank_job_id_is_missing_identifier() {
    let fake = FakeBackend::default();
    fake.respond_to_upload(StatusCode::OK, json!({ "job_id": "" }));
    let client = GatewayClient::new(common::spawn(fake).await);

    let err = client.submit(&request()).await.unwrap_err();
    assert_eq!(err, JobError::MissingJobIdentifier);
}

#[tokio::test]
async fn gateway_submit_to_unreachable_backend_is_upload_failed() {
    let client = GatewayClient::new(common::unreachable_url().await);

    let err = client.submit(&request()).await.unwrap_err();
    assert_matches!(err, JobError::UploadFailed(msg) if !msg.is_empty());
}

// ---------------------------------------------------------------------------
// GatewayClient: status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gateway_status_uses_path_segment_and_parses_snapshot() {
    let fake = FakeBackend::default();
    fake.respond_to_status(
        StatusCode::OK,
        json!({ "status": "completed", "result": "Hola mundo" }),
    );
    let client = GatewayClient::new(common::spawn(fake.clone()).await);

    let snapshot = client.fetch_status(&job_id("abc123")).await.unwrap();
    assert_eq!(
        snapshot.classify(),
        JobStatus::Completed {
            result: "Hola mundo".into()
        }
    );
    assert_eq!(fake.status_lookups(), vec!["abc123".to_string()]);
}

#[tokio::test]
async fn gateway_status_passes_not_found_through_as_snapshot() {
    let fake = FakeBackend::default();
    fake.respond_to_status(
        StatusCode::OK,
        json!({ "status": "not_found", "error": "Job ID not found" }),
    );
    let client = GatewayClient::new(common::spawn(fake).await);

    let snapshot = client.fetch_status(&job_id("missing")).await.unwrap();
    assert_matches!(snapshot.classify(), JobStatus::Unrecognized { .. });
}

#[tokio::test]
async fn gateway_status_non_success_is_status_check_failed() {
    let fake = FakeBackend::default();
    fake.respond_to_status(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let client = GatewayClient::new(common::spawn(fake).await);

    let err = client.fetch_status(&job_id("abc123")).await.unwrap_err();
    assert_eq!(
        err,
        JobError::StatusCheckFailed("Status check failed with status 500".into())
    );
}

// ---------------------------------------------------------------------------
// ProxyApiClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn proxy_api_client_uses_api_routes() {
    let fake = FakeBackend::default();
    fake.respond_to_status(StatusCode::OK, json!({ "status": "pending" }));
    let client = ProxyApiClient::new(format!("{}/", common::spawn(fake.clone()).await));

    let id = client.submit(&request()).await.unwrap();
    let snapshot = client.fetch_status(&id).await.unwrap();

    assert_eq!(snapshot, StatusSnapshot::new("pending"));
    assert_eq!(fake.uploads().len(), 1);
    assert_eq!(fake.status_lookups(), vec!["abc123".to_string()]);
}

#[tokio::test]
async fn proxy_api_client_reports_proxy_failures_by_status() {
    let fake = FakeBackend::default();
    fake.respond_to_upload(
        StatusCode::BAD_GATEWAY,
        json!({ "error": "Backend upload failed with status 500" }),
    );
    fake.respond_to_status(
        StatusCode::BAD_GATEWAY,
        json!({ "status": "error", "error": "Failed to get status" }),
    );
    let client = ProxyApiClient::new(common::spawn(fake).await);

    assert_eq!(
        client.submit(&request()).await.unwrap_err(),
        JobError::UploadFailed("Upload failed with status 502".into())
    );
    assert_eq!(
        client.fetch_status(&job_id("abc123")).await.unwrap_err(),
        JobError::StatusCheckFailed("Status check failed with status 502".into())
    );
}
