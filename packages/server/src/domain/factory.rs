//! Domain factories for creating domain entities and value objects.

use super::{GameId, error::ValueObjectError};

/// Factory for generating GameId instances.
///
/// This factory encapsulates the logic for generating new room codes,
/// separating the generation concern from the validation logic in GameId.
pub struct GameIdFactory;

impl GameIdFactory {
    /// Generate a new room code from a random UUID v4.
    ///
    /// # Returns
    ///
    /// A Result containing the first eight lowercase hex digits of a fresh UUID v4
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<GameId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        GameId::from_uuid(uuid)
    }
}
