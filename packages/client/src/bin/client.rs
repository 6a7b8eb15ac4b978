//! irori CLI chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-client -- --user-id u1 --display-name Alice
//! cargo run --bin irori-client -- --url ws://127.0.0.1:3000/ws --user-id u1 --display-name Alice
//! ```

use clap::Parser;

use irori_client::runner::run_client;
use irori_client::session::ClientIdentity;
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-client")]
#[command(about = "CLI chat client for the irori hub", long_about = None)]
struct Args {
    /// WebSocket URL of the chat hub
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Stable user id to identify as
    #[arg(long)]
    user_id: String,

    /// Display name shown to other participants
    #[arg(long)]
    display_name: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let identity = ClientIdentity {
        user_id: args.user_id,
        display_name: args.display_name,
    };

    if let Err(e) = run_client(args.url, identity).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
