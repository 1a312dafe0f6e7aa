use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{Request, Response, StatusCode};
use axum::routing::{self, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use vidlate_api::config::ServerConfig;
use vidlate_api::router::build_app_router;
use vidlate_api::state::AppState;

pub const BOUNDARY: &str = "vidlate-test-boundary";

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

/// One upload as seen by the fake backend.
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    pub target_language: Option<String>,
}

pub struct FakeState {
    pub upload_status: StatusCode,
    pub upload_body: Value,
    pub status_code: StatusCode,
    pub status_body: Value,
    pub uploads: Vec<ReceivedUpload>,
    pub status_lookups: Vec<String>,
    /// Delay applied before every reply.
    pub delay: Option<Duration>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            upload_status: StatusCode::OK,
            upload_body: json!({ "job_id": "abc123", "message": "Processing started" }),
            status_code: StatusCode::OK,
            status_body: json!({ "status": "pending" }),
            uploads: Vec::new(),
            status_lookups: Vec::new(),
            delay: None,
        }
    }
}

/// Transcription backend stand-in serving `POST /upload` and `GET /{job_id}`.
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

    pub fn respond_after(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    async fn wait(&self) {
        let delay = self.state.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn status_lookups(&self) -> Vec<String> {
        self.state.lock().unwrap().status_lookups.clone()
    }
}

async fn fake_upload(
    State(fake): State<FakeBackend>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut received = ReceivedUpload::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or_default().to_string().as_str() {
            "file" => {
                received.file_name = field.file_name().map(str::to_string);
                received.bytes = field.bytes().await.unwrap().to_vec();
            }
            "target_language" => {
                received.target_language = Some(field.text().await.unwrap());
            }
            _ => {}
        }
    }

    fake.wait().await;
    let mut state = fake.state.lock().unwrap();
    state.uploads.push(received);
    (state.upload_status, Json(state.upload_body.clone()))
}

async fn fake_status(
    State(fake): State<FakeBackend>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    fake.wait().await;
    let mut state = fake.state.lock().unwrap();
    state.status_lookups.push(job_id);
    (state.status_code, Json(state.status_body.clone()))
}

/// Serve `fake` on an ephemeral local port and return its base URL.
pub async fn spawn_backend(fake: FakeBackend) -> String {
    let app = Router::new()
        .route("/upload", post(fake_upload))
        .route("/{job_id}", routing::get(fake_status))
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

// ---------------------------------------------------------------------------
// App under test
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` pointed at `backend_url`.
pub fn test_config(backend_url: String) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        backend_url,
        upload_limit_mb: 1,
        backend_timeout_secs: 10,
    }
}

/// Build the full application router, same middleware stack as production.
pub fn build_test_app(backend_url: String) -> Router {
    build_test_app_with(test_config(backend_url))
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState::new(config.clone()).unwrap();
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A part of a multipart form.
pub enum Part<'a> {
    File { name: &'a str, file_name: &'a str, bytes: &'a [u8] },
    Text { name: &'a str, value: &'a str },
}

/// Build a `POST` request with a `multipart/form-data` body.
pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: video/mp4\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// The usual valid upload: `video.mp4` to be translated into Spanish.
pub fn video_upload() -> Request<Body> {
    multipart_request(
        "/api/upload",
        &[
            Part::File {
                name: "file",
                file_name: "video.mp4",
                bytes: b"fake mp4 bytes",
            },
            Part::Text {
                name: "target_language",
                value: "es",
            },
        ],
    )
}
