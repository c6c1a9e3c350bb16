//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::GameStateDto;

/// Room detail for the inspection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetailDto {
    pub state: GameStateDto,
    /// Live connections registered for the room in this process
    pub connections: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
