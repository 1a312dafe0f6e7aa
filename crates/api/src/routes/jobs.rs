//! Submission and status proxy endpoints.
//!
//! Both forward a single call to the backend and relay its body on success.
//! Any other method on these paths gets a JSON 405.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use vidlate_core::status::StatusSnapshot;
use vidlate_core::upload::{UploadRequest, VideoFile, FILE_FIELD, TARGET_LANGUAGE_FIELD};
use vidlate_gateway::UploadResponse;

use crate::error::{AppError, AppResult, MISSING_UPLOAD_FIELDS_MESSAGE};
use crate::state::AppState;

/// Used when the `file` part carries no file name.
const FALLBACK_FILE_NAME: &str = "upload.mp4";

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub id: Option<String>,
}

/// POST /api/upload
///
/// Accepts multipart `file` and `target_language`, forwards them to the
/// backend's `/upload`, and returns the backend's JSON with `200`.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload without multipart body");
        AppError::BadRequest(MISSING_UPLOAD_FIELDS_MESSAGE.to_string())
    })?;

    let mut file: Option<VideoFile> = None;
    let mut target_language: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                let file_name = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(FALLBACK_FILE_NAME)
                    .to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                let mut video = VideoFile::new(file_name, bytes.to_vec());
                if let Some(content_type) = content_type {
                    video = video.with_content_type(content_type);
                }
                file = Some(video);
            }
            TARGET_LANGUAGE_FIELD => {
                let value = field.text().await?;
                let value = value.trim();
                if !value.is_empty() {
                    target_language = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let (Some(file), Some(target_language)) = (file, target_language) else {
        return Err(AppError::BadRequest(
            MISSING_UPLOAD_FIELDS_MESSAGE.to_string(),
        ));
    };

    let request = UploadRequest::validated(Some(file), &target_language)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!(
        file_name = %request.file.file_name,
        bytes = request.file.len(),
        target_language = %request.target_language,
        "Forwarding upload to backend",
    );

    let response = state
        .gateway
        .upload(&request)
        .await
        .map_err(AppError::UploadFailed)?;

    tracing::info!(
        job_id = response.job_id.as_deref().unwrap_or("<none>"),
        "Backend accepted upload",
    );

    Ok(Json(response))
}

/// GET /api/status?id=<job_id>
///
/// Returns the backend's status snapshot for the job unchanged.
async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<StatusSnapshot>> {
    let job_id = query
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing job id".to_string()))?;

    let snapshot = state
        .gateway
        .job_status(&job_id)
        .await
        .map_err(AppError::StatusFailed)?;

    tracing::debug!(
        job_id = %job_id,
        status = snapshot.status.as_deref().unwrap_or("<missing>"),
        "Fetched job status",
    );

    Ok(Json(snapshot))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Mount the job routes (relative to `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload).fallback(method_not_allowed))
        .route("/status", get(status).fallback(method_not_allowed))
}
