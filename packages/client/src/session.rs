//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use irori_server::infrastructure::dto::websocket::{
    ChatPayloadDto, ClientEvent, IdentifyDto, MessageDto, ServerEvent, UserDto,
};

use crate::error::ClientError;
use crate::formatter::MessageFormatter;
use crate::rpc::RpcClient;
use crate::ui::redisplay_prompt;

const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Identity the session announces on connect.
///
/// Supplied by whoever launched the client (CLI arguments here); the hub
/// takes it as an upstream fact and performs no verification of its own.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub user_id: String,
    pub display_name: String,
}

/// Run one WebSocket client session until the connection drops or the user
/// exits.
pub async fn run_client_session(url: &str, identity: &ClientIdentity) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat hub");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send.\n\
         Commands: /users, /history [n]. Press Ctrl+C to exit.\n",
        identity.display_name
    );

    let (mut write, mut read) = ws_stream.split();

    // Single writer: every outgoing frame (chat, identify, RPC) goes
    // through this channel so ordering on the socket is well defined.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let write_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if write.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let rpc = Arc::new(RpcClient::new(out_tx.clone()));

    // Announce identity before anything else
    let identify = ClientEvent::Identify(IdentifyDto {
        id: Some(identity.user_id.clone()),
        display_name: Some(identity.display_name.clone()),
        avatar_url: None,
    });
    out_tx
        .send(identify.to_frame())
        .map_err(|_| ClientError::ConnectionError("connection closed before identify".into()))?;

    // Task: render inbound events, feed RPC responses to the caller
    let rpc_for_read = rpc.clone();
    let name_for_read = identity.display_name.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(ServerEvent::ChatMessage(message)) => {
                        print!("{}", MessageFormatter::format_chat_message(&message));
                        redisplay_prompt(&name_for_read);
                    }
                    Ok(ServerEvent::UserConnected(user)) => {
                        print!("{}", MessageFormatter::format_user_connected(&user));
                        redisplay_prompt(&name_for_read);
                    }
                    Ok(ServerEvent::UserDisconnected(user_id)) => {
                        print!("{}", MessageFormatter::format_user_disconnected(&user_id));
                        redisplay_prompt(&name_for_read);
                    }
                    Ok(ServerEvent::UsersUpdated(users)) => {
                        tracing::debug!("Roster updated: {} online", users.len());
                    }
                    Ok(ServerEvent::JsonRpc(raw)) => {
                        rpc_for_read.handle_response(&raw).await;
                    }
                    Err(e) => {
                        tracing::warn!("Unrecognized frame: {}", e);
                    }
                },
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Blocking thread for rustyline (synchronous readline)
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt_name = identity.display_name.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Task: turn input lines into chat frames or RPC calls
    let rpc_for_input = rpc.clone();
    let out_for_input = out_tx.clone();
    let name_for_input = identity.display_name.clone();
    let mut input_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            if let Some(rest) = line.strip_prefix("/history") {
                let limit = rest.trim().parse::<i64>().unwrap_or(DEFAULT_HISTORY_LIMIT);
                show_history(&rpc_for_input, limit).await;
                redisplay_prompt(&name_for_input);
            } else if line == "/users" {
                show_roster(&rpc_for_input).await;
                redisplay_prompt(&name_for_input);
            } else {
                let frame = ClientEvent::ChatMessage(ChatPayloadDto { content: line }).to_frame();
                if out_for_input.send(frame).is_err() {
                    break;
                }
            }
        }
    });

    // If either side ends, tear down the rest
    let result = tokio::select! {
        _ = &mut read_task => {
            input_task.abort();
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        _ = &mut input_task => {
            read_task.abort();
            Ok(())
        }
    };
    write_task.abort();

    result
}

/// Fetch and render the chat history over the channel transport.
async fn show_history(rpc: &RpcClient, limit: i64) {
    match rpc
        .call("chat.getMessages", json!({"limit": limit, "offset": 0}))
        .await
    {
        Ok(result) => match serde_json::from_value::<Vec<MessageDto>>(result) {
            Ok(messages) => print!("{}", MessageFormatter::format_history(&messages)),
            Err(e) => tracing::warn!("Malformed history result: {}", e),
        },
        Err(e) => print!(
            "{}",
            MessageFormatter::format_rpc_failure("history", &e.to_string())
        ),
    }
}

/// Fetch and render the roster over the channel transport.
async fn show_roster(rpc: &RpcClient) {
    match rpc.call("chat.getActiveUsers", json!({})).await {
        Ok(result) => match serde_json::from_value::<Vec<UserDto>>(result) {
            Ok(users) => print!("{}", MessageFormatter::format_roster(&users)),
            Err(e) => tracing::warn!("Malformed roster result: {}", e),
        },
        Err(e) => print!(
            "{}",
            MessageFormatter::format_rpc_failure("users", &e.to_string())
        ),
    }
}
