//! Data transfer objects for the WebSocket protocol, the HTTP API and the store.

pub mod http;
pub mod websocket;

pub use websocket::{ClientAction, FrameError, GameStateDto, ServerMessage};
