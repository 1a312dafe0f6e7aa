use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vidlate_gateway::error::describe_request_error;
use vidlate_gateway::GatewayError;

/// Body of every 405 reply.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// Reported when the upload form lacks `file` or `target_language`.
pub const MISSING_UPLOAD_FIELDS_MESSAGE: &str = "Missing file or target language";

/// Reported when the backend answers a status lookup with a non-2xx code.
pub const STATUS_LOOKUP_FAILED_MESSAGE: &str = "Failed to get status";

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Backend failures are reported as `502 Bad Gateway`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The multipart body could not be read.
    #[error("Invalid upload body: {0}")]
    Multipart(#[from] MultipartError),

    /// The route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Forwarding an upload to the backend failed.
    #[error("Backend upload failed: {0}")]
    UploadFailed(#[source] GatewayError),

    /// Forwarding a status lookup to the backend failed.
    #[error("Backend status lookup failed: {0}")]
    StatusFailed(#[source] GatewayError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Multipart(err) => {
                let status = err.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_REQUEST"
                };
                error_body(status, code, err.body_text())
            }
            AppError::MethodNotAllowed => error_body(
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            ),
            AppError::UploadFailed(err) => {
                tracing::error!(error = %err, "Backend upload failed");
                let message = match &err {
                    GatewayError::ApiError { status, .. } => {
                        format!("Backend upload failed with status {status}")
                    }
                    GatewayError::Request(e) => describe_request_error(e),
                    other => other.to_string(),
                };
                error_body(StatusCode::BAD_GATEWAY, "BAD_GATEWAY", message)
            }
            AppError::StatusFailed(err) => {
                tracing::error!(error = %err, "Backend status lookup failed");
                let message = match &err {
                    GatewayError::ApiError { .. } => STATUS_LOOKUP_FAILED_MESSAGE.to_string(),
                    GatewayError::Request(e) => describe_request_error(e),
                    other => other.to_string(),
                };
                let body = json!({
                    "status": "error",
                    "error": message,
                    "code": "BAD_GATEWAY",
                });
                (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response()
            }
        }
    }
}

fn error_body(status: StatusCode, code: &'static str, message: String) -> Response {
    let body = json!({
        "error": message,
        "code": code,
    });

    (status, axum::Json(body)).into_response()
}

