use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use mason_core::ids::ProjectId;

use crate::server::AppState;

/// GET /ws/{project_id} — upgrade and subscribe to a project's event stream.
pub async fn ws_handler(
    Path(project_id): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let project_id = ProjectId::from_raw(project_id);
    ws.on_upgrade(move |socket| handle_socket(socket, project_id, state))
}

/// Drive one subscriber connection. The handshake is already complete when
/// this runs, so registration is just the locked map insert.
async fn handle_socket(socket: WebSocket, project_id: ProjectId, state: AppState) {
    let (connection_id, mut rx) = state.bus.connect(&project_id);
    tracing::info!(
        project_id = %project_id,
        connection_id = %connection_id,
        "subscriber connected"
    );

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Writer task: forward broadcast payloads to the socket.
    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_tx.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Reader task: subscribers only listen. Inbound frames are drained
    // until the client closes or the transport errors.
    let reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            if matches!(msg, WsMessage::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = writer => {},
        _ = reader => {},
    }

    state.bus.disconnect(&project_id, &connection_id);
    tracing::info!(
        project_id = %project_id,
        connection_id = %connection_id,
        "subscriber disconnected"
    );
}
