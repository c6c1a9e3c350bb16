//! Infrastructure layer: wire formats, connection registry and store backends.

pub mod dto;
pub mod registry;
pub mod store;

pub use registry::{BroadcastReport, ConnectionHandle, ConnectionRegistry, TransportError};
pub use store::{InMemoryGameStateStore, RedisGameStateStore};
