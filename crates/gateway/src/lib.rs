//! HTTP clients for the transcription/translation backend.
//!
//! Two clients implement the [`SubmissionProxy`](vidlate_core::proxy::SubmissionProxy)
//! and [`StatusProxy`](vidlate_core::proxy::StatusProxy) contracts:
//!
//! - [`GatewayClient`] talks to the Backend Gateway directly
//!   (`POST /upload`, `GET /{job_id}`).
//! - [`ProxyApiClient`] talks to the client-facing proxy API served by
//!   `vidlate-api` (`POST /api/upload`, `GET /api/status?id=`).

pub mod error;
pub mod gateway;
mod http;
pub mod proxy_api;

pub use error::GatewayError;
pub use gateway::{GatewayClient, UploadResponse};
pub use proxy_api::ProxyApiClient;
