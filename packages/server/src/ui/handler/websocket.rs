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
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, InboundEvent},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionIdFactory::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives encoded events from the rx channel and writes them to the WebSocket.
///
/// Events for this connection from any source (other connections, timers,
/// the welcome lookup) are queued on the same channel, so they reach the
/// client in the order they were pushed.
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

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    state
        .session_controller
        .connect(connection_id.clone(), tx)
        .await;

    let controller = state.session_controller.clone();
    let reader_id = connection_id.clone();

    // Events from one connection are handled one at a time, in arrival order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", reader_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(text.as_str()) {
                    Ok(event) => {
                        tracing::debug!("Received from '{}': {:?}", reader_id, event);
                        controller
                            .handle(&reader_id, InboundEvent::from(event))
                            .await;
                    }
                    Err(e) => {
                        tracing::warn!("Skipping malformed event from '{}': {}", reader_id, e);
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", reader_id);
                    break;
                }
                // ping/pong は axum が処理する
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other.
    // The reader must be gone before disconnect so no event runs after it.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
    };

    state.session_controller.disconnect(&connection_id).await;
}
