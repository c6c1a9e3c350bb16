//! Store abstraction for room state.
//!
//! The domain defines the trait; `infrastructure::store` provides the
//! in-memory and Redis implementations (dependency inversion).

use std::time::Duration;

use async_trait::async_trait;

use super::{entity::GameState, error::StoreError, value_object::GameId};

/// Key-value store holding one state document per room, with per-key expiration.
///
/// State is always written as a whole document; there are no partial updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameStateStore: Send + Sync {
    /// Write the full state under the room's key.
    ///
    /// Like Redis `SET`, this replaces the document and clears any expiration;
    /// callers re-arm it with `expire` when needed.
    async fn save(&self, state: &GameState) -> Result<(), StoreError>;

    /// Read the state for a room, or `None` if absent or expired.
    async fn find(&self, game_id: &GameId) -> Result<Option<GameState>, StoreError>;

    /// Arm an expiration on the room's key.
    async fn expire(&self, game_id: &GameId, ttl: Duration) -> Result<(), StoreError>;

    /// Clear any expiration on the room's key.
    async fn persist(&self, game_id: &GameId) -> Result<(), StoreError>;
}
