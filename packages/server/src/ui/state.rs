//! Shared application state.

use std::sync::Arc;

use crate::domain::EventBroadcaster;
use crate::rpc::RpcDispatcher;
use crate::usecase::{DisconnectUserUseCase, IdentifyUserUseCase, SendChatMessageUseCase};

/// Shared application state
pub struct AppState {
    /// UseCase for user identification
    pub identify_usecase: Arc<IdentifyUserUseCase>,
    /// UseCase for user disconnection
    pub disconnect_usecase: Arc<DisconnectUserUseCase>,
    /// UseCase for chat message submission
    pub send_chat_usecase: Arc<SendChatMessageUseCase>,
    /// JSON-RPC method registry, shared by both transport bindings
    pub dispatcher: Arc<RpcDispatcher>,
    /// Fan-out of event frames to attached connections
    pub broadcaster: Arc<dyn EventBroadcaster>,
}
