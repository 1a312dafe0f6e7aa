//! Client for the Backend Gateway HTTP endpoints.
//!
//! Wraps the backend's upload (`POST /upload`) and status
//! (`GET /{job_id}`) endpoints using [`reqwest`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vidlate_core::error::JobError;
use vidlate_core::job::JobId;
use vidlate_core::proxy::{StatusProxy, SubmissionProxy};
use vidlate_core::status::StatusSnapshot;
use vidlate_core::upload::UploadRequest;

use crate::error::GatewayError;
use crate::http;

/// HTTP client for a single Backend Gateway.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

/// Body returned by the upload endpoint after the backend accepted a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Backend-assigned job identifier.
    #[serde(default)]
    pub job_id: Option<String>,
    /// Informational message (e.g. `"Processing started"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    /// The job identifier, if present and non-blank.
    pub fn job_id(&self) -> Option<JobId> {
        self.job_id.clone().and_then(JobId::parse)
    }
}

impl GatewayClient {
    /// Create a new client for a backend.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://backend:8000`.
    pub fn new(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (for custom timeouts or connection pooling).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: http::normalize_base(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a video for transcription and translation.
    ///
    /// Sends a multipart `POST /upload` with `file` and `target_language`
    /// fields and returns the parsed response body unchanged, whether or not
    /// it carries a `job_id`.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, GatewayError> {
        let form = http::upload_form(request)?;

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        http::parse_response(response).await
    }

    /// Retrieve the current status of a job.
    ///
    /// Sends a `GET /{job_id}` request.
    pub async fn job_status(&self, job_id: &str) -> Result<StatusSnapshot, GatewayError> {
        let url = http::join_segment(&self.base_url, job_id)?;
        let response = self.client.get(url).send().await?;

        http::parse_response(response).await
    }
}

#[async_trait]
impl SubmissionProxy for GatewayClient {
    async fn submit(&self, request: &UploadRequest) -> Result<JobId, JobError> {
        let response = self
            .upload(request)
            .await
            .map_err(GatewayError::into_upload_error)?;

        let job_id = response
            .job_id()
            .ok_or_else(|| GatewayError::MissingJobId.into_upload_error())?;

        tracing::info!(
            job_id = %job_id,
            target_language = %request.target_language,
            file_name = %request.file.file_name,
            "Upload accepted by backend",
        );

        Ok(job_id)
    }
}

#[async_trait]
impl StatusProxy for GatewayClient {
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot, JobError> {
        self.job_status(job_id.as_str())
            .await
            .map_err(GatewayError::into_status_error)
    }
}
