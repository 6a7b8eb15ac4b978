//! JSON-RPC caller for the channel transport.
//!
//! A persistent channel has no implicit request boundary, so every call
//! registers itself in a pending-request table keyed by correlation id and
//! waits on a one-shot channel. The entry is resolved exactly once: either
//! the matching response arrives first, or the fixed timeout fires first
//! and removes the entry, after which a late response is ignored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};

use irori_server::infrastructure::dto::websocket::ClientEvent;
use irori_server::rpc::{RpcErrorObject, RpcRequest, RpcResponse};

/// How long a channel call waits for its correlated response
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures of a channel RPC call
#[derive(Debug, Error)]
pub enum RpcCallError {
    /// No matching response arrived within the timeout window
    #[error("RPC request timed out after {0:?}")]
    Timeout(Duration),
    /// The hub answered with an error envelope
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(RpcErrorObject),
    /// The channel went away before the response arrived
    #[error("connection closed before the response arrived")]
    ConnectionClosed,
}

type PendingCall = oneshot::Sender<Result<Value, RpcErrorObject>>;

/// Issues JSON-RPC calls over the persistent channel.
///
/// Outgoing frames go through the session's single writer; incoming
/// `jsonrpc` events must be fed to [`RpcClient::handle_response`] by the
/// session's read loop.
pub struct RpcClient {
    outgoing: mpsc::UnboundedSender<String>,
    pending: Arc<Mutex<HashMap<u64, PendingCall>>>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(outgoing: mpsc::UnboundedSender<String>) -> Self {
        Self::with_timeout(outgoing, REQUEST_TIMEOUT)
    }

    /// Override the response timeout. Tests shrink it to keep the timeout
    /// path fast; production callers use [`RpcClient::new`].
    pub fn with_timeout(outgoing: mpsc::UnboundedSender<String>, timeout: Duration) -> Self {
        Self {
            outgoing,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    /// Call a remote method and wait for the correlated response.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcCallError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let request = RpcRequest::new(method, params, json!(id));
        let envelope =
            serde_json::to_string(&request).expect("request serialization never fails");
        let frame = ClientEvent::JsonRpc(envelope).to_frame();

        if self.outgoing.send(frame).is_err() {
            self.pending.lock().await.remove(&id);
            return Err(RpcCallError::ConnectionClosed);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(outcome)) => outcome.map_err(RpcCallError::Rpc),
            // the session dropped the pending table (connection teardown)
            Ok(Err(_)) => Err(RpcCallError::ConnectionClosed),
            Err(_) => {
                // timeout fired first: remove the listener so a late
                // response is dropped instead of double-delivered
                self.pending.lock().await.remove(&id);
                Err(RpcCallError::Timeout(self.timeout))
            }
        }
    }

    /// Feed a serialized response envelope received on the `jsonrpc` event.
    ///
    /// Responses that correlate to no pending call (late after a timeout,
    /// or foreign) are logged and dropped.
    pub async fn handle_response(&self, raw: &str) {
        let response = match serde_json::from_str::<RpcResponse>(raw) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Unparseable RPC response: {}", e);
                return;
            }
        };

        let Some(id) = response.id.as_u64() else {
            tracing::warn!("RPC response with non-numeric id: {}", response.id);
            return;
        };

        let Some(waiter) = self.pending.lock().await.remove(&id) else {
            tracing::debug!("No pending call for RPC response id {}", id);
            return;
        };

        let outcome = match (response.result, response.error) {
            (_, Some(error)) => Err(error),
            (Some(result), None) => Ok(result),
            (None, None) => Ok(Value::Null),
        };
        // the waiter may have timed out in the meantime; either way the
        // call resolves at most once
        let _ = waiter.send(outcome);
    }
}
