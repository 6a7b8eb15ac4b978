//! Method registry and request router.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::User;

use super::envelope::{RpcRequest, RpcResponse, INTERNAL_ERROR, INVALID_PARAMS};

/// Identity of the caller, as known to the transport binding.
///
/// The channel binding fills in the connection's identified user; the
/// one-shot HTTP binding has no connection identity and stays anonymous.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub user: Option<User>,
}

impl CallContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn identified(user: User) -> Self {
        Self { user: Some(user) }
    }
}

/// Failure of a registered method, surfaced to the caller as an RPC error
/// response.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct MethodError {
    pub code: i64,
    pub message: String,
}

impl MethodError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: message.into(),
        }
    }
}

/// A named remote method.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RpcMethod: Send + Sync {
    async fn call(&self, params: Value, context: CallContext) -> Result<Value, MethodError>;
}

/// Routes request envelopes to registered methods and wraps their outcome
/// into correlated response envelopes.
///
/// Transport-agnostic: both bindings hand envelopes to the same instance.
pub struct RpcDispatcher {
    methods: HashMap<String, Arc<dyn RpcMethod>>,
}

impl RpcDispatcher {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, method: Arc<dyn RpcMethod>) {
        self.methods.insert(name.into(), method);
    }

    /// Route one request. Returns `None` for notifications, which never
    /// produce a response (not even for an unknown method).
    pub async fn dispatch(&self, request: RpcRequest, context: CallContext) -> Option<RpcResponse> {
        let notification = request.is_notification();
        let id = request.id.unwrap_or(Value::Null);

        let Some(method) = self.methods.get(&request.method) else {
            tracing::warn!("RPC call to unregistered method '{}'", request.method);
            if notification {
                return None;
            }
            return Some(RpcResponse::method_not_found(id, &request.method));
        };

        let params = request.params.unwrap_or(Value::Null);
        let outcome = method.call(params, context).await;

        if notification {
            return None;
        }
        match outcome {
            Ok(result) => Some(RpcResponse::success(id, result)),
            Err(e) => Some(RpcResponse::error(id, e.code, e.message)),
        }
    }

    /// Parse a serialized envelope and route it.
    ///
    /// Malformed input yields an error response instead of failing the
    /// connection: non-JSON input a parse error, JSON of the wrong shape an
    /// invalid-request error carrying whatever id could be salvaged.
    pub async fn dispatch_raw(&self, raw: &str, context: CallContext) -> Option<RpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Unparseable RPC envelope: {}", e);
                return Some(RpcResponse::parse_error());
            }
        };

        let salvaged_id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<RpcRequest>(value) {
            Ok(request) => self.dispatch(request, context).await,
            Err(e) => {
                tracing::warn!("Malformed RPC request: {}", e);
                Some(RpcResponse::invalid_request(salvaged_id))
            }
        }
    }
}

impl Default for RpcDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
