//! Server configuration from command line flags and environment variables.

use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Which `GameStateStore` backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Process-local map; state is lost on restart
    Memory,
    Redis,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "tictactoe-server",
    version,
    about = "Real-time multiplayer tic-tac-toe session server"
)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "SERVER_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Game state store backend
    #[arg(long, env = "GAME_STORE", value_enum, default_value_t = StoreBackend::Redis)]
    pub store: StoreBackend,

    /// Redis connection URL (used with `--store redis`)
    #[arg(long, env = "REDIS_URL", default_value = "redis://localhost:6379")]
    pub redis_url: String,

    /// Seconds an empty or finished room is kept in the store
    #[arg(long, env = "ROOM_TTL_SECS", default_value_t = 900)]
    pub room_ttl_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn room_ttl(&self) -> Duration {
        Duration::from_secs(self.room_ttl_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
