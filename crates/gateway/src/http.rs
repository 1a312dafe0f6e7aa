//! Request building and response handling shared by both clients.

use reqwest::multipart::{Form, Part};
use vidlate_core::upload::{UploadRequest, FILE_FIELD, TARGET_LANGUAGE_FIELD};

use crate::error::GatewayError;

/// Build the multipart body for an upload.
pub(crate) fn upload_form(request: &UploadRequest) -> Result<Form, GatewayError> {
    let mut part = Part::bytes(request.file.bytes.clone()).file_name(request.file.file_name.clone());
    if let Some(content_type) = &request.file.content_type {
        part = part.mime_str(content_type)?;
    }

    Ok(Form::new()
        .part(FILE_FIELD, part)
        .text(TARGET_LANGUAGE_FIELD, request.target_language.clone()))
}

/// Join `segment` onto `base` as a single, escaped path segment.
pub(crate) fn join_segment(base: &str, segment: &str) -> Result<reqwest::Url, GatewayError> {
    let mut url =
        reqwest::Url::parse(base).map_err(|e| GatewayError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| GatewayError::InvalidUrl(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`GatewayError::ApiError`] containing the
/// status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(GatewayError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

/// Trim trailing slashes so `format!("{base}/path")` never doubles them.
pub(crate) fn normalize_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
