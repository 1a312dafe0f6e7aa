//! In-process fake backend used by the client integration tests.
//!
//! Serves both route shapes the clients speak: the Backend Gateway
//! (`POST /upload`, `GET /{job_id}`) and the proxy API
//! (`POST /api/upload`, `GET /api/status?id=`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// One upload as seen by the fake backend.
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub target_language: Option<String>,
}

/// Canned responses plus a record of every request received.
pub struct FakeState {
    pub upload_status: StatusCode,
    pub upload_body: Value,
    pub status_code: StatusCode,
    pub status_body: Value,
    pub uploads: Vec<ReceivedUpload>,
    pub status_lookups: Vec<String>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            upload_status: StatusCode::ACCEPTED,
            upload_body: json!({ "job_id": "abc123", "message": "Processing started" }),
            status_code: StatusCode::OK,
            status_body: json!({ "status": "processing" }),
            uploads: Vec::new(),
            status_lookups: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn respond_to_upload(&self, status: StatusCode, body: Value) {
        let mut state = self.state.lock().unwrap();
        state.upload_status = status;
        state.upload_body = body;
    }

    pub fn respond_to_status(&self, status: StatusCode, body: Value) {
        let mut state = self.state.lock().unwrap();
        state.status_code = status;
        state.status_body = body;
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn status_lookups(&self) -> Vec<String> {
        self.state.lock().unwrap().status_lookups.clone()
    }
}

async fn upload(State(fake): State<FakeBackend>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut received = ReceivedUpload::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                received.file_name = field.file_name().map(str::to_string);
                received.content_type = field.content_type().map(str::to_string);
                received.bytes = field.bytes().await.unwrap().to_vec();
            }
            "target_language" => {
                received.target_language = Some(field.text().await.unwrap());
            }
            _ => {}
        }
    }

    let mut state = fake.state.lock().unwrap();
    state.uploads.push(received);
    (state.upload_status, Json(state.upload_body.clone()))
}

fn status_reply(fake: &FakeBackend, job_id: String) -> (StatusCode, Json<Value>) {
    let mut state = fake.state.lock().unwrap();
    state.status_lookups.push(job_id);
    (state.status_code, Json(state.status_body.clone()))
}

async fn backend_status(
    State(fake): State<FakeBackend>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    status_reply(&fake, job_id)
}

async fn api_status(
    State(fake): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    status_reply(&fake, params.get("id").cloned().unwrap_or_default())
}

/// Serve `fake` on an ephemeral local port and return its base URL.
pub async fn spawn(fake: FakeBackend) -> String {
    let app = Router::new()
        .route("/upload", post(upload))
        .route("/{job_id}", get(backend_status))
        .route("/api/upload", post(upload))
        .route("/api/status", get(api_status))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
