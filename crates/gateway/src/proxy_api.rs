//! Client for the client-facing proxy API served by `vidlate-api`.
//!
//! This is what a presentation layer talks to: `POST /api/upload` and
//! `GET /api/status?id=`. Error bodies from the proxy (`{ "error": ... }`)
//! are not surfaced; failures are reported by status code, the same way
//! the backend client reports them.

use async_trait::async_trait;
use vidlate_core::error::JobError;
use vidlate_core::job::JobId;
use vidlate_core::proxy::{StatusProxy, SubmissionProxy};
use vidlate_core::status::StatusSnapshot;
use vidlate_core::upload::UploadRequest;

use crate::error::GatewayError;
use crate::gateway::UploadResponse;
use crate::http;

/// HTTP client for a `vidlate-api` instance.
pub struct ProxyApiClient {
    client: reqwest::Client,
    api_url: String,
}

impl ProxyApiClient {
    /// * `api_url` - Base URL of the proxy service, e.g. `http://localhost:3000`.
    pub fn new(api_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: http::normalize_base(api_url),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, GatewayError> {
        let form = http::upload_form(request)?;

        let response = self
            .client
            .post(format!("{}/api/upload", self.api_url))
            .multipart(form)
            .send()
            .await?;

        http::parse_response(response).await
    }

    async fn status(&self, job_id: &JobId) -> Result<StatusSnapshot, GatewayError> {
        let response = self
            .client
            .get(format!("{}/api/status", self.api_url))
            .query(&[("id", job_id.as_str())])
            .send()
            .await?;

        http::parse_response(response).await
    }
}

#[async_trait]
impl SubmissionProxy for ProxyApiClient {
    async fn submit(&self, request: &UploadRequest) -> Result<JobId, JobError> {
        let response = self
            .upload(request)
            .await
            .map_err(GatewayError::into_upload_error)?;

        response
            .job_id()
            .ok_or_else(|| GatewayError::MissingJobId.into_upload_error())
    }
}

#[async_trait]
impl StatusProxy for ProxyApiClient {
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot, JobError> {
        self.status(job_id)
            .await
            .map_err(GatewayError::into_status_error)
    }
}
