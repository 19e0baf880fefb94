// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for the live chat channel.
//!
//! One socket per client ID. A greeting `connection` event is sent on
//! upgrade, then every text frame runs through the session pipeline. On
//! disconnect the client's active conversation is finalized and the
//! registry entry is removed, unless a newer connection has already
//! replaced it.

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use concierge_core::time::now_ts;
use concierge_core::wire::{InboundFrame, OutboundEvent};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::server::GatewayState;

/// WebSocket upgrade handler for `GET /ws/{client_id}`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(client_id): Path<String>,
    State(state): State<GatewayState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id))
}

/// Drive one WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: GatewayState, client_id: String) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (conn_tx, mut rx) = state.registry.connect(&client_id);
    tracing::info!(client_id, "client connected");

    // Forward registry events to the socket.
    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize outbound event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let greeting = OutboundEvent::Connection {
        content: format!("Connected to {}", state.agent_name),
        timestamp: now_ts(),
    };
    state.registry.send_to(&client_id, greeting).await;

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let frame: InboundFrame = match serde_json::from_str(text.as_str()) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::warn!(client_id, error = %e, "invalid WebSocket frame");
                        continue;
                    }
                };
                if let Err(e) = state.pipeline.handle_message(&client_id, &frame.content).await {
                    tracing::error!(client_id, error = %e, "message handling failed");
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary and ping/pong.
        }
    }

    teardown_connection(&state, &client_id, &conn_tx).await;
    sender_task.abort();
    tracing::info!(client_id, "client disconnected");
}

/// Drop this socket's registry entry and, only when it was still the
/// current connection, finalize the client's conversation.
///
/// A reconnect may already own the registry entry; the conversation then
/// belongs to the new socket and must stay open.
pub async fn teardown_connection(
    state: &GatewayState,
    client_id: &str,
    conn_tx: &mpsc::Sender<OutboundEvent>,
) {
    if state.registry.disconnect_current(client_id, conn_tx) {
        state.pipeline.finalize(client_id).await;
    }
}
