//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::Mark;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ClientId validation error
    #[error("ClientId cannot be empty")]
    ClientIdEmpty,

    /// ClientId too long error
    #[error("ClientId cannot exceed {max} characters (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },

    /// GameId length error
    #[error("GameId must be exactly {expected} characters (got {actual})")]
    GameIdInvalidLength { expected: usize, actual: usize },

    /// GameId character set error
    #[error("GameId must contain only lowercase letters and digits (got: {0})")]
    GameIdInvalidCharacter(String),

    /// CellIndex range error
    #[error("CellIndex must be between 0 and {max} (got {actual})")]
    CellIndexOutOfRange { max: usize, actual: i64 },

    /// Mark validation error
    #[error("Mark must be \"X\" or \"O\" (got: {0})")]
    MarkInvalid(String),
}

/// Game rule violations.
///
/// None of these are reported to clients except `RoomFull`; the rest are
/// silently dropped by the session layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Room is full: maximum {capacity} players allowed")]
    RoomFull { capacity: usize },

    #[error("Not enough players: {required} required (current: {current})")]
    NotEnoughPlayers { required: usize, current: usize },

    #[error("Game has already started")]
    AlreadyStarted,

    #[error("Game has not started")]
    NotStarted,

    #[error("Game is already over")]
    GameOver,

    #[error("Wrong turn: expected {expected:?}, got {actual}")]
    WrongTurn {
        expected: Option<Mark>,
        actual: Mark,
    },

    #[error("Cell {0} is already occupied")]
    CellOccupied(usize),
}

/// Errors raised by a `GameStateStore` implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the command
    #[error("Store backend error: {0}")]
    Backend(String),

    /// The game state could not be encoded
    #[error("Failed to serialize game state: {0}")]
    Serialization(String),

    /// A stored document exists but is not a valid game state
    #[error("Corrupted game state at '{key}': {reason}")]
    Corrupted { key: String, reason: String },
}
