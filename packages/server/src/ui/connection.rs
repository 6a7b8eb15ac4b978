//! Per-connection lifecycle.
//!
//! Every attachment walks `Unidentified -> Identified -> Closed` (terminal).
//! Only identified connections appear in the roster. The struct owns the
//! state and drives the use cases, so the transitions are testable without
//! a socket; the WebSocket handler feeds it decoded events.

use std::sync::Arc;

use crate::domain::{ConnectionId, Sender, User};
use crate::infrastructure::dto::websocket::IdentifyDto;
use crate::rpc::{CallContext, RpcDispatcher};
use crate::usecase::{DisconnectUserUseCase, IdentifyUserUseCase, SendChatMessageUseCase};

use super::state::AppState;

/// Lifecycle state of one connection
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Attached, identity not yet declared
    Unidentified,
    /// Identity declared; the user is in the roster
    Identified(User),
    /// Transport closed; terminal
    Closed,
}

/// State machine for one connection.
pub struct ConnectionLifecycle {
    connection_id: ConnectionId,
    state: ConnectionState,
    identify_usecase: Arc<IdentifyUserUseCase>,
    disconnect_usecase: Arc<DisconnectUserUseCase>,
    send_chat_usecase: Arc<SendChatMessageUseCase>,
    dispatcher: Arc<RpcDispatcher>,
}

impl ConnectionLifecycle {
    pub fn new(connection_id: ConnectionId, state: &AppState) -> Self {
        Self {
            connection_id,
            state: ConnectionState::Unidentified,
            identify_usecase: state.identify_usecase.clone(),
            disconnect_usecase: state.disconnect_usecase.clone(),
            send_chat_usecase: state.send_chat_usecase.clone(),
            dispatcher: state.dispatcher.clone(),
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Handle an identify event. Re-identify replaces the roster entry and
    /// re-broadcasts; both presence events fire every time.
    pub async fn on_identify(&mut self, payload: IdentifyDto) -> Option<User> {
        if self.state == ConnectionState::Closed {
            tracing::warn!(
                "Ignoring identify on closed connection '{}'",
                self.connection_id.as_str()
            );
            return None;
        }

        let user = self
            .identify_usecase
            .execute(self.connection_id.clone(), payload)
            .await;
        tracing::info!(
            "Connection '{}' identified as '{}'",
            self.connection_id.as_str(),
            user.id.as_str()
        );
        self.state = ConnectionState::Identified(user.clone());
        Some(user)
    }

    /// Handle an inbound chat message. Sending before identify is
    /// tolerated; the message carries the anonymous stand-in identity
    /// derived from the connection id.
    pub async fn on_chat_message(&mut self, content: String) {
        if self.state == ConnectionState::Closed {
            return;
        }

        let sender = self.current_sender();
        if let Err(e) = self.send_chat_usecase.execute(sender, content).await {
            // the connection stays usable after a rejected message
            tracing::warn!(
                "Rejected chat message from connection '{}': {}",
                self.connection_id.as_str(),
                e
            );
        }
    }

    /// Handle an inbound serialized RPC envelope. Returns the serialized
    /// response envelope, or `None` for notifications.
    pub async fn on_rpc(&self, raw: &str) -> Option<String> {
        if self.state == ConnectionState::Closed {
            return None;
        }

        let context = match &self.state {
            ConnectionState::Identified(user) => CallContext::identified(user.clone()),
            _ => CallContext::anonymous(),
        };
        let response = self.dispatcher.dispatch_raw(raw, context).await?;
        Some(serde_json::to_string(&response).expect("response serialization never fails"))
    }

    /// Handle transport close from any state. Idempotent: a second close on
    /// an already-closed connection is a no-op.
    pub async fn on_close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }

        self.disconnect_usecase.execute(&self.connection_id).await;
        tracing::info!("Connection '{}' closed", self.connection_id.as_str());
        self.state = ConnectionState::Closed;
    }

    fn current_sender(&self) -> Sender {
        match &self.state {
            ConnectionState::Identified(user) => Sender::from(user),
            _ => Sender::from(&User::anonymous(&self.connection_id)),
        }
    }
}
