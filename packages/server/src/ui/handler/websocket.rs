//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{domain::ClientId, infrastructure::ConnectionHandle, ui::state::AppState};

/// How the receive loop ended
enum ConnectionEnd {
    /// Peer closed the socket or the transport failed
    Closed,
    /// Processing a frame hit an internal error
    Failed,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(client_id_str): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> ClientId (Domain Model)
    let client_id = match ClientId::try_from(client_id_str.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid client_id '{}': {}", client_id_str, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, client_id: ClientId) {
    let (mut sender, mut receiver) = socket.split();

    // Outbound queue for this connection; the registry holds clones of the sender
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection = ConnectionHandle::new(tx);
    let connection_id = connection.id();
    tracing::info!("Client '{}' connected ({})", client_id, connection_id);

    let coordinator = state.coordinator.clone();
    let recv_client_id = client_id.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", recv_client_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", recv_client_id, text);
                    if let Err(e) = coordinator
                        .handle_frame(&connection, &recv_client_id, text.as_str())
                        .await
                    {
                        tracing::error!(
                            "Closing connection of '{}' after internal error: {}",
                            recv_client_id,
                            e
                        );
                        return ConnectionEnd::Failed;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_client_id);
                    break;
                }
                _ => {}
            }
        }
        ConnectionEnd::Closed
    });

    // Spawn a task to forward queued messages to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    let end = tokio::select! {
        result = &mut recv_task => {
            send_task.abort();
            result.unwrap_or_else(|e| {
                tracing::error!("Receive task for '{}' panicked: {}", client_id, e);
                ConnectionEnd::Failed
            })
        }
        _ = &mut send_task => {
            recv_task.abort();
            ConnectionEnd::Closed
        }
    };

    match end {
        ConnectionEnd::Closed => {
            if let Err(e) = state.coordinator.disconnect(connection_id, &client_id).await {
                tracing::warn!("Failed to notify room about '{}' leaving: {}", client_id, e);
            }
        }
        ConnectionEnd::Failed => state.coordinator.abandon(connection_id).await,
    }
    tracing::info!("Client '{}' disconnected ({})", client_id, connection_id);
}
