use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::bus::{ProjectBus, DEFAULT_SEND_QUEUE};
use crate::chat;
use crate::ws;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (`0` for auto-assign).
    pub port: u16,
    /// Outbound queue depth per subscriber.
    pub max_send_queue: usize,
    /// Per-send delivery bound during broadcast.
    pub send_timeout_secs: u64,
    /// Built SPA directory; unmatched routes fall back to its index.html.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8787,
            max_send_queue: DEFAULT_SEND_QUEUE,
            send_timeout_secs: 5,
            static_dir: None,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub bus: Arc<ProjectBus>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/chat", post(chat::chat_handler))
        .route("/ws/{project_id}", get(ws::ws_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    }
}

/// Create and start the server. Returns a handle that keeps it alive.
pub async fn start(config: ServerConfig) -> Result<ServerHandle, std::io::Error> {
    let bus = Arc::new(ProjectBus::new(
        config.max_send_queue,
        Duration::from_secs(config.send_timeout_secs),
    ));

    let state = AppState {
        bus: Arc::clone(&bus),
    };
    let router = build_router(state, config.static_dir.as_deref());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "Mason server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        bus,
        _server: server_handle,
    })
}

/// Handle returned by `start()`. Producers publish through `bus`.
pub struct ServerHandle {
    pub port: u16,
    pub bus: Arc<ProjectBus>,
    _server: tokio::task::JoinHandle<()>,
}

/// Health check HTTP endpoint: liveness plus live bus occupancy.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "connections": state.bus.total_connections(),
        "projects": state.bus.project_count(),
    }))
}
