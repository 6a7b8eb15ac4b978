//! In-memory store implementations.
//!
//! The hub keeps no state across restarts, so the in-memory stores are the
//! only implementations. Both are guarded by a `tokio::sync::Mutex`, which
//! is the single serialization point that keeps mutations linearizable
//! across connection handlers.

pub mod message_log;
pub mod presence;

pub use message_log::InMemoryMessageLog;
pub use presence::InMemoryPresenceRegistry;
