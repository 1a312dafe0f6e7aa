use vidlate_core::error::JobError;

/// Errors from the backend HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, bad body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// An upload response parsed fine but carried no `job_id`.
    #[error("No job ID received from server")]
    MissingJobId,

    /// The configured base URL cannot address the requested resource.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// Normalize a failed submission into the job error taxonomy.
    pub fn into_upload_error(self) -> JobError {
        match self {
            Self::ApiError { status, .. } => {
                JobError::UploadFailed(format!("Upload failed with status {status}"))
            }
            Self::MissingJobId => JobError::MissingJobIdentifier,
            Self::Request(e) => JobError::UploadFailed(describe_request_error(&e)),
            Self::InvalidUrl(msg) => JobError::UploadFailed(msg),
        }
    }

    /// Normalize a failed status lookup into the job error taxonomy.
    pub fn into_status_error(self) -> JobError {
        match self {
            Self::ApiError { status, .. } => {
                JobError::StatusCheckFailed(format!("Status check failed with status {status}"))
            }
            Self::Request(e) => JobError::StatusCheckFailed(describe_request_error(&e)),
            other => JobError::StatusCheckFailed(other.to_string()),
        }
    }
}

/// Human-readable reason for a transport-level failure.
pub fn describe_request_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("Request timed out: {err}")
    } else if err.is_connect() {
        format!("Could not reach server: {err}")
    } else if err.is_decode() {
        format!("Invalid response body: {err}")
    } else {
        err.to_string()
    }
}
