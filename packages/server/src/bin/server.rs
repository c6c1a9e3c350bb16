//! Tic-tac-toe session server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tictactoe-server -- --store memory
//! ```

use clap::Parser;
use tictactoe_server::ServerConfig;
use tictactoe_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = tictactoe_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
