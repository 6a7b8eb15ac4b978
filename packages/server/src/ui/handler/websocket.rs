//! WebSocket connection handler: the channel transport.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::ConnectionId;
use crate::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use crate::ui::connection::ConnectionLifecycle;
use crate::ui::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to
/// the WebSocket sender.
///
/// This is the only writer of the socket, so frames queued by the
/// broadcaster and RPC responses reach the client in queue order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // the transport assigns the connection id; it is the join key between
    // this attachment and whatever user identifies on it
    let connection_id = ConnectionId::generate();
    tracing::info!("Connection '{}' attached", connection_id.as_str());

    let (tx, rx) = mpsc::unbounded_channel();
    state.broadcaster.register(connection_id.clone(), tx).await;

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let mut lifecycle = ConnectionLifecycle::new(connection_id.clone(), &state);

    loop {
        tokio::select! {
            inbound = receiver.next() => {
                let message = match inbound {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        tracing::warn!(
                            "WebSocket error on connection '{}': {}",
                            connection_id.as_str(),
                            e
                        );
                        break;
                    }
                    None => break,
                };

                match message {
                    Message::Text(text) => {
                        handle_frame(&mut lifecycle, &state, &text).await;
                    }
                    Message::Ping(_) => {
                        // ping/pong is handled by the WebSocket protocol
                        tracing::debug!("Received ping");
                    }
                    Message::Close(_) => {
                        tracing::info!(
                            "Connection '{}' requested close",
                            connection_id.as_str()
                        );
                        break;
                    }
                    _ => {}
                }
            }
            _ = &mut send_task => break,
        }
    }

    // transport close from any state: the lifecycle removes the user and
    // announces the departure when the connection had identified
    lifecycle.on_close().await;
    send_task.abort();
}

async fn handle_frame(lifecycle: &mut ConnectionLifecycle, state: &Arc<AppState>, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Identify(payload)) => {
            lifecycle.on_identify(payload).await;
        }
        Ok(ClientEvent::ChatMessage(payload)) => {
            lifecycle.on_chat_message(payload.content).await;
        }
        Ok(ClientEvent::JsonRpc(envelope)) => {
            // responses go back to the calling connection only, on the same
            // event name; correlation is by envelope id
            if let Some(response) = lifecycle.on_rpc(&envelope).await {
                let frame = ServerEvent::JsonRpc(response).to_frame();
                if let Err(e) = state
                    .broadcaster
                    .send_to(lifecycle.connection_id(), &frame)
                    .await
                {
                    tracing::warn!(
                        "Failed to push RPC response to connection '{}': {}",
                        lifecycle.connection_id().as_str(),
                        e
                    );
                }
            }
        }
        Err(e) => {
            // a malformed frame never crashes the connection
            tracing::warn!(
                "Dropping unparseable frame on connection '{}': {}",
                lifecycle.connection_id().as_str(),
                e
            );
        }
    }
}
