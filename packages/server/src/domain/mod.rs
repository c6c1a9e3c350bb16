//! Domain layer for the tic-tac-toe session server.
//!
//! This module contains the game rules and state representation, independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod rule;
pub mod value_object;

pub use entity::{BOARD_SIZE, Board, GameResult, GameState, MAX_PLAYERS};
pub use error::{GameError, StoreError, ValueObjectError};
pub use factory::GameIdFactory;
pub use repository::GameStateStore;
pub use rule::{WIN_LINES, check_winner};
pub use value_object::{CellIndex, ClientId, ConnectionId, GameId, Mark};
