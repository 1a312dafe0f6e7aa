use std::time::Duration;

/// Headroom the whole-request timeout keeps over the backend call timeout.
pub const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 5;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Raised at runtime
    /// when it would cut off a backend call, see [`Self::request_timeout`].
    pub request_timeout_secs: u64,
    /// Base URL of the transcription/translation backend.
    pub backend_url: String,
    /// Largest accepted upload body in megabytes (default: `512`).
    pub upload_limit_mb: usize,
    /// Timeout for a single backend call in seconds (default: `300`).
    pub backend_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    /// | `BACKEND_URL`          | `http://localhost:8000`    |
    /// | `UPLOAD_LIMIT_MB`      | `512`                      |
    /// | `BACKEND_TIMEOUT_SECS` | `300`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let upload_limit_mb: usize = std::env::var("UPLOAD_LIMIT_MB")
            .unwrap_or_else(|_| "512".into())
            .parse()
            .expect("UPLOAD_LIMIT_MB must be a valid usize");

        let backend_timeout_secs: u64 = std::env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("BACKEND_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            backend_url,
            upload_limit_mb,
            backend_timeout_secs,
        }
    }

    /// Timeout for a whole proxied request.
    ///
    /// Never shorter than `backend_timeout_secs` plus
    /// [`REQUEST_TIMEOUT_MARGIN_SECS`], so the backend call always gives up
    /// first.
    pub fn request_timeout(&self) -> Duration {
        let floor = self
            .backend_timeout_secs
            .saturating_add(REQUEST_TIMEOUT_MARGIN_SECS);
        Duration::from_secs(self.request_timeout_secs.max(floor))
    }

    /// Timeout for a single backend call.
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// Upload body limit in bytes.
    pub fn upload_limit_bytes(&self) -> usize {
        self.upload_limit_mb.saturating_mul(1024 * 1024)
    }
}
