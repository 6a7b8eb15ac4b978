//! Chat method handlers registered with the dispatcher.
//!
//! - `chat.getMessages(limit?, offset?)` → sequence of messages
//! - `chat.sendMessage(content)` → `{accepted, message}`
//! - `chat.getActiveUsers()` → sequence of users

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::Sender;
use crate::infrastructure::dto::websocket::{MessageDto, UserDto};
use crate::usecase::{GetActiveUsersUseCase, GetMessagesUseCase, SendChatMessageUseCase};

use super::dispatcher::{CallContext, MethodError, RpcMethod};

const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Parse params for a method whose params are all optional. Absent params
/// are treated as the empty object.
fn optional_params<T: DeserializeOwned + Default>(params: Value) -> Result<T, MethodError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params).map_err(|e| MethodError::invalid_params(e.to_string()))
}

/// Parse params for a method with required fields.
fn required_params<T: DeserializeOwned>(params: Value) -> Result<T, MethodError> {
    serde_json::from_value(params).map_err(|e| MethodError::invalid_params(e.to_string()))
}

fn to_result_value<T: serde::Serialize>(value: &T) -> Result<Value, MethodError> {
    serde_json::to_value(value).map_err(|e| MethodError::internal(e.to_string()))
}

// ========================================
// chat.getMessages
// ========================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GetMessagesParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

pub struct GetMessagesMethod {
    usecase: Arc<GetMessagesUseCase>,
}

impl GetMessagesMethod {
    pub fn new(usecase: Arc<GetMessagesUseCase>) -> Self {
        Self { usecase }
    }
}

#[async_trait]
impl RpcMethod for GetMessagesMethod {
    async fn call(&self, params: Value, _context: CallContext) -> Result<Value, MethodError> {
        let params: GetMessagesParams = optional_params(params)?;
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let messages = self.usecase.execute(limit, offset).await;
        let page: Vec<MessageDto> = messages.iter().map(MessageDto::from).collect();
        to_result_value(&page)
    }
}

// ========================================
// chat.sendMessage
// ========================================

#[derive(Debug, Deserialize)]
struct SendMessageParams {
    content: String,
}

pub struct SendMessageMethod {
    usecase: Arc<SendChatMessageUseCase>,
}

impl SendMessageMethod {
    pub fn new(usecase: Arc<SendChatMessageUseCase>) -> Self {
        Self { usecase }
    }
}

#[async_trait]
impl RpcMethod for SendMessageMethod {
    async fn call(&self, params: Value, context: CallContext) -> Result<Value, MethodError> {
        let params: SendMessageParams = required_params(params)?;

        // channel callers carry their connection's identity; HTTP callers
        // have none and fall back to the anonymous sender
        let sender = match &context.user {
            Some(user) => Sender::from(user),
            None => Sender::anonymous(),
        };

        let message = self
            .usecase
            .execute(sender, params.content)
            .await
            .map_err(|e| MethodError::invalid_params(e.to_string()))?;

        to_result_value(&json!({
            "accepted": true,
            "message": MessageDto::from(&message),
        }))
    }
}

// ========================================
// chat.getActiveUsers
// ========================================

pub struct GetActiveUsersMethod {
    usecase: Arc<GetActiveUsersUseCase>,
}

impl GetActiveUsersMethod {
    pub fn new(usecase: Arc<GetActiveUsersUseCase>) -> Self {
        Self { usecase }
    }
}

#[async_trait]
impl RpcMethod for GetActiveUsersMethod {
    async fn call(&self, _params: Value, _context: CallContext) -> Result<Value, MethodError> {
        let users = self.usecase.execute().await;
        let roster: Vec<UserDto> = users.iter().map(UserDto::from).collect();
        to_result_value(&roster)
    }
}
