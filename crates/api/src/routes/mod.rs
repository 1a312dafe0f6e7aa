pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Client-facing API routes, mounted under `/api`.
///
/// ```text
/// POST /upload         forward a video to the backend
/// GET  /status?id=     look up a job's status
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(jobs::router())
}
