use std::sync::Arc;

use vidlate_gateway::GatewayClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the transcription/translation backend.
    pub gateway: Arc<GatewayClient>,
}

impl AppState {
    /// Build state with a backend client bounded by `backend_timeout_secs`.
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.backend_timeout())
            .build()?;
        let gateway = GatewayClient::with_client(client, config.backend_url.clone());

        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
        })
    }
}
