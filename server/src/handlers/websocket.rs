//! WebSocket handler for live queries.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use todo_engine::{ClientMessage, ServerMessage};
use tokio::sync::mpsc;

use crate::AppState;

/// Serve one live query until the client goes away.
///
/// The connection is registered before the initial collection is read, and
/// that read happens under the publish lock, so no change can fall between
/// the initial message and the first broadcast.
pub async fn handle_live_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let sub_id = state.subscriptions.register(tx);

    // Forward queued messages to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if let Err(e) = ws_sender.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send WebSocket message: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize WebSocket message: {}", e);
                }
            }
        }
    });

    send_snapshot(&state, &sub_id).await;

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ping) => {
                    state.subscriptions.send_to(&sub_id, ServerMessage::Pong);
                }
                Ok(ClientMessage::Refresh) => send_snapshot(&state, &sub_id).await,
                Err(e) => {
                    state.subscriptions.send_to(
                        &sub_id,
                        ServerMessage::error(format!("Invalid message format: {}", e)),
                    );
                }
            },
            Ok(Message::Binary(_)) => {
                tracing::warn!("Binary messages not supported");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                tracing::debug!(sub_id = %sub_id, "WebSocket close frame received");
                break;
            }
            Err(e) => {
                tracing::warn!(sub_id = %sub_id, "WebSocket error: {}", e);
                break;
            }
        }
    }

    state.subscriptions.unregister(&sub_id);
    send_task.abort();

    tracing::info!(
        sub_id = %sub_id,
        active_subscriptions = state.subscriptions.subscription_count(),
        "Live query closed"
    );
}

/// Send the current collection to one subscription.
async fn send_snapshot(state: &AppState, sub_id: &str) {
    let _guard = state.publish_lock.lock().await;

    let message = match state.repo.list().await {
        Ok(todos) => ServerMessage::Todos { todos },
        Err(e) => {
            tracing::error!(error = %e, "Failed to read todos for live query");
            ServerMessage::error("failed to read todos")
        }
    };
    state.subscriptions.send_to(sub_id, message);
}
