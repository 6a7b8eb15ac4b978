//! irori chat hub server.
//!
//! Serves presence, chat, and JSON-RPC over a WebSocket channel, plus the
//! same JSON-RPC methods over a one-shot HTTP endpoint.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use irori_server::{
    domain::MessageIdFactory,
    infrastructure::{
        pusher::WebSocketBroadcaster,
        repository::{InMemoryMessageLog, InMemoryPresenceRegistry},
    },
    rpc::{
        methods::{GetActiveUsersMethod, GetMessagesMethod, SendMessageMethod},
        RpcDispatcher,
    },
    ui::{state::AppState, Server},
    usecase::{
        DisconnectUserUseCase, GetActiveUsersUseCase, GetMessagesUseCase, IdentifyUserUseCase,
        SendChatMessageUseCase,
    },
};
use irori_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "Group-chat hub with presence and dual-transport JSON-RPC", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Stores and broadcaster
    // 2. UseCases
    // 3. RPC dispatcher
    // 4. Server

    // 1. Stores (in-memory; state lives for the process lifetime only)
    let registry = Arc::new(InMemoryPresenceRegistry::new());
    let message_log = Arc::new(InMemoryMessageLog::new());
    let broadcaster = Arc::new(WebSocketBroadcaster::new());
    let id_factory = Arc::new(MessageIdFactory::new());
    let clock = Arc::new(SystemClock);

    // 2. UseCases
    let identify_usecase = Arc::new(IdentifyUserUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUserUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let send_chat_usecase = Arc::new(SendChatMessageUseCase::new(
        message_log.clone(),
        broadcaster.clone(),
        id_factory,
        clock,
    ));
    let get_messages_usecase = Arc::new(GetMessagesUseCase::new(message_log));
    let get_active_users_usecase = Arc::new(GetActiveUsersUseCase::new(registry));

    // 3. RPC dispatcher, shared by the HTTP and WebSocket bindings
    let mut dispatcher = RpcDispatcher::new();
    dispatcher.register(
        "chat.getMessages",
        Arc::new(GetMessagesMethod::new(get_messages_usecase)),
    );
    dispatcher.register(
        "chat.sendMessage",
        Arc::new(SendMessageMethod::new(send_chat_usecase.clone())),
    );
    dispatcher.register(
        "chat.getActiveUsers",
        Arc::new(GetActiveUsersMethod::new(get_active_users_usecase)),
    );

    // 4. Create and run the server
    let server = Server::new(AppState {
        identify_usecase,
        disconnect_usecase,
        send_chat_usecase,
        dispatcher: Arc::new(dispatcher),
        broadcaster,
    });
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
