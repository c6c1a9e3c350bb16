//! UseCase layer error definitions.

use thiserror::Error;

use crate::{
    domain::{GameError, GameId, StoreError},
    infrastructure::TransportError,
};

/// Errors returned by the game action use cases
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameActionError {
    /// No state stored for the room (never created, or expired)
    #[error("Game '{0}' not found")]
    RoomNotFound(GameId),

    /// The action breaks a game rule
    #[error(transparent)]
    Rejected(#[from] GameError),

    /// Every generated room code was already taken
    #[error("Could not allocate an unused room code")]
    RoomCodeUnavailable,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Internal failures while handling a frame.
///
/// These end the connection that triggered them; other connections are unaffected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Could not allocate an unused room code")]
    RoomCodeUnavailable,
}
