//! UI layer: the axum router, transport handlers, and the per-connection
//! lifecycle.

pub mod connection;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{build_router, Server};
