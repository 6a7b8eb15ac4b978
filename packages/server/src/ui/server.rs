//! Server execution logic.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        http::{health_check, rpc_handler},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the hub's router: the WebSocket channel, the one-shot JSON-RPC
/// endpoint, and the health check.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // channel transport: presence events, chat, and RPC over one socket
        .route("/ws", get(websocket_handler))
        // request/response transport: RPC only
        .route("/rpc", post(rpc_handler))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Chat hub server
///
/// Encapsulates the wired application state and runs the axum server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Run the chat hub server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat hub listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("JSON-RPC endpoint: http://{}/rpc", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
