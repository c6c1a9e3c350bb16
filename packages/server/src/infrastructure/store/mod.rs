//! `GameStateStore` implementations.
//!
//! Both backends keep the same JSON document (see `GameStateDto`) under
//! `game:{gameId}`.

pub mod inmemory;
pub mod redis;

pub use inmemory::InMemoryGameStateStore;
pub use redis::RedisGameStateStore;

use crate::{
    domain::{GameState, StoreError},
    infrastructure::dto::GameStateDto,
};

pub(crate) fn encode_state(state: &GameState) -> Result<String, StoreError> {
    serde_json::to_string(&GameStateDto::from(state))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

pub(crate) fn decode_state(key: &str, document: &str) -> Result<GameState, StoreError> {
    let corrupted = |reason: String| StoreError::Corrupted {
        key: key.to_string(),
        reason,
    };
    let dto: GameStateDto = serde_json::from_str(document).map_err(|e| corrupted(e.to_string()))?;
    GameState::try_from(dto).map_err(corrupted)
}
