//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionHandle, ConnectionId},
    ui::state::AppState,
    usecase::BroadcastEngine,
};

/// How a session's receive side ended.
enum SessionEnd {
    Closed,
    TransportError(String),
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound queue into the WebSocket sink.
///
/// Ends when the queue is closed or the socket refuses a frame.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that feeds inbound frames to the engine, in the order received.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    engine: Arc<BroadcastEngine>,
    connection_id: ConnectionId,
) -> JoinHandle<SessionEnd> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => return SessionEnd::TransportError(e.to_string()),
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", connection_id, text.as_str());
                    engine
                        .on_inbound_message(&connection_id, text.as_str())
                        .await;
                }
                Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => {
                        engine.on_inbound_message(&connection_id, text).await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Dropping non UTF-8 binary frame from '{}': {}",
                            connection_id,
                            e
                        );
                    }
                },
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping/pong from '{}'", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    return SessionEnd::Closed;
                }
            }
        }
        SessionEnd::Closed
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    // Outbound queue for this connection; the engine only ever enqueues
    let (tx, rx) = mpsc::unbounded_channel();
    let connection = ConnectionHandle::open(tx);
    let connection_id = connection.id();

    state.engine.on_connect(connection).await;

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(receiver, state.engine.clone(), connection_id);

    // If any one of the tasks completes, abort the other
    let end = tokio::select! {
        result = &mut recv_task => {
            send_task.abort();
            result.unwrap_or_else(|e| SessionEnd::TransportError(e.to_string()))
        }
        _ = &mut send_task => {
            recv_task.abort();
            SessionEnd::Closed
        }
    };

    match end {
        SessionEnd::Closed => {
            state.engine.on_disconnect(&connection_id).await;
        }
        SessionEnd::TransportError(error) => {
            state
                .engine
                .on_transport_error(&connection_id, error)
                .await;
        }
    }
}
