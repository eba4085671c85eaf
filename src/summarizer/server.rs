//! HTTP front end for [`SummarizationService`].
//!
//! ## Endpoints
//!
//! - `POST /summarize` - summarize caller-supplied search results
//! - `GET /health` - liveness probe

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use super::service::{SummarizationService, SummarizeRequest, SummarizeResponse};
use crate::config::ServerSection;
use crate::error::{ResearchError, Result};

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Clone)]
struct AppState {
    service: Arc<SummarizationService>,
}

/// Running summarization server.
pub struct SummarizerServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl SummarizerServer {
    /// Bind `{config.host}:{config.port}` (port `0` auto-assigns) and serve in
    /// a background task.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Server`] if the listener cannot bind.
    pub async fn start(service: Arc<SummarizationService>, config: &ServerSection) -> Result<Self> {
        let app = router(service);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| ResearchError::Server(format!("bind {bind_addr} failed: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| ResearchError::Server(format!("failed to get local addr: {e}")))?;

        info!("summarizer listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("summarizer server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SummarizerServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Routes for the summarization API.
pub fn router(service: Arc<SummarizationService>) -> Router {
    Router::new()
        .route("/summarize", post(handle_summarize))
        .route("/health", get(handle_health))
        .with_state(AppState { service })
}

async fn handle_summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Json<SummarizeResponse> {
    Json(state.service.summarize(request).await)
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}
