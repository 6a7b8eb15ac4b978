//! Presence-and-messaging hub for the irori chat application.
//!
//! Clients attach over a persistent WebSocket, announce identity, exchange
//! chat messages, and observe presence changes. The same JSON-RPC methods
//! are served over a one-shot HTTP endpoint and the WebSocket channel.

// layers
pub mod domain;
pub mod infrastructure;
pub mod rpc;
pub mod ui;
pub mod usecase;
