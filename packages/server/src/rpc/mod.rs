//! JSON-RPC 2.0 layer: envelopes, the method registry, and the chat method
//! handlers.
//!
//! The dispatcher is transport-agnostic; the HTTP and WebSocket bindings in
//! the UI layer share one instance.

pub mod dispatcher;
pub mod envelope;
pub mod methods;

pub use dispatcher::{CallContext, MethodError, RpcDispatcher, RpcMethod};
pub use envelope::{RpcErrorObject, RpcRequest, RpcResponse};
