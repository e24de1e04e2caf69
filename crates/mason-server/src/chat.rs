use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use mason_core::events::AgentEvent;
use mason_core::ids::ProjectId;

use crate::bus::ProjectBus;
use crate::scaffold::{self, ScaffoldFile, Stack};
use crate::server::AppState;

#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    pub project_id: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatResponse {
    pub project_id: ProjectId,
    pub intent: &'static str,
    pub reply: String,
    pub files: Vec<ScaffoldFile>,
    pub created_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("message must not be empty")]
    EmptyMessage,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::EmptyMessage => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// POST /api/chat — the single conversational entry point. On a build
/// intent the starter files come back in the response and the scaffold
/// event sequence streams to the project's subscribers in the background;
/// the response never waits on delivery.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    let project_id = req
        .project_id
        .map(ProjectId::from_raw)
        .unwrap_or_default();
    let created_at = chrono::Utc::now().to_rfc3339();

    match scaffold::detect_build_intent(&req.message) {
        Some(stack) => {
            let files = scaffold::starter_files(stack);
            tracing::info!(
                project_id = %project_id,
                stack = stack.name(),
                files = files.len(),
                "build intent detected"
            );

            let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
            tokio::spawn(stream_scaffold_events(
                Arc::clone(&state.bus),
                project_id.clone(),
                stack,
                paths,
            ));

            Ok(Json(ChatResponse {
                reply: format!(
                    "Scaffolding a {} project with {} starter files.",
                    stack.name(),
                    files.len()
                ),
                project_id,
                intent: "build",
                files,
                created_at,
            }))
        }
        None => Ok(Json(ChatResponse {
            project_id,
            intent: "chat",
            reply: "Tell me what to build, e.g. \"build me a todo app\".".into(),
            files: Vec::new(),
            created_at,
        })),
    }
}

/// Publish the scaffold lifecycle for one build onto the bus. Delivery is
/// best effort; subscribers that joined late simply miss earlier events.
async fn stream_scaffold_events(
    bus: Arc<ProjectBus>,
    project_id: ProjectId,
    stack: Stack,
    paths: Vec<String>,
) {
    bus.broadcast(
        &project_id,
        &AgentEvent::ScaffoldStarted {
            project_id: project_id.clone(),
            stack: stack.name().into(),
        },
    )
    .await;

    let total = paths.len();
    for (i, path) in paths.into_iter().enumerate() {
        bus.broadcast(
            &project_id,
            &AgentEvent::FileGenerated {
                project_id: project_id.clone(),
                path,
            },
        )
        .await;
        bus.broadcast(
            &project_id,
            &AgentEvent::ScaffoldProgress {
                project_id: project_id.clone(),
                pct: (((i + 1) * 100) / total.max(1)) as u8,
                message: format!("{} of {total} files generated", i + 1),
            },
        )
        .await;
    }

    bus.broadcast(
        &project_id,
        &AgentEvent::ScaffoldComplete {
            project_id: project_id.clone(),
            file_count: total,
        },
    )
    .await;
}
