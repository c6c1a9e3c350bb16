//! Real-time multiplayer tic-tac-toe session server.
//!
//! Clients connect over WebSocket, create or join a room by its eight-character
//! code, and exchange moves that are validated and broadcast to every
//! connection in the room. Room state lives in an expiring key-value store
//! (Redis, or an in-memory stand-in) so it survives server restarts within
//! the room's time-to-live.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{create_router, run as run_server};
