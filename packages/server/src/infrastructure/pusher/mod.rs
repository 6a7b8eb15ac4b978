//! Event fan-out implementations.
//!
//! This module provides the concrete implementations of the
//! `EventBroadcaster` trait. Currently only WebSocket.

pub mod websocket;

pub use websocket::WebSocketBroadcaster;
