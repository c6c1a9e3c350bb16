//! Core domain models for the tic-tac-toe session server.

use super::{
    error::GameError,
    rule::check_winner,
    value_object::{CellIndex, ClientId, GameId, Mark},
};

/// Number of cells on the board
pub const BOARD_SIZE: usize = 9;

/// Maximum number of players allowed in a room
pub const MAX_PLAYERS: usize = 2;

/// 3x3 board, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board([Option<Mark>; BOARD_SIZE]);

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self([None; BOARD_SIZE])
    }

    pub fn from_cells(cells: [Option<Mark>; BOARD_SIZE]) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[Option<Mark>; BOARD_SIZE] {
        &self.0
    }

    pub fn get(&self, index: CellIndex) -> Option<Mark> {
        self.0[index.value()]
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    fn place(&mut self, index: CellIndex, mark: Mark) {
        self.0[index.value()] = Some(mark);
    }
}

/// Outcome of a board evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameResult {
    #[default]
    InProgress,
    Draw,
    Won { mark: Mark, line: [usize; 3] },
}

impl GameResult {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }
}

/// Authoritative state of one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Room code, immutable after creation
    pub id: GameId,
    pub board: Board,
    /// Up to two client ids; the first joiner is `players[0]`
    pub players: Vec<ClientId>,
    pub started: bool,
    /// Whose move is expected next; `None` before start
    pub next_player: Option<Mark>,
    pub result: GameResult,
}

impl GameState {
    /// Create a fresh room owned by its creator
    pub fn new(id: GameId, creator: ClientId) -> Self {
        Self {
            id,
            board: Board::new(),
            players: vec![creator],
            started: false,
            next_player: None,
            result: GameResult::InProgress,
        }
    }

    pub fn has_player(&self, client_id: &ClientId) -> bool {
        self.players.contains(client_id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn is_over(&self) -> bool {
        self.result.is_over()
    }

    /// Waiting for an opponent or finished; the room's store entry should expire.
    pub fn is_reclaimable(&self) -> bool {
        self.players.len() < MAX_PLAYERS || self.is_over()
    }

    /// Add a player to the room.
    ///
    /// Returns `Ok(false)` when the client is already a member.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RoomFull` if two other players are already present
    pub fn join(&mut self, client_id: ClientId) -> Result<bool, GameError> {
        if self.has_player(&client_id) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(GameError::RoomFull {
                capacity: MAX_PLAYERS,
            });
        }
        self.players.push(client_id);
        Ok(true)
    }

    /// Start the match; X moves first.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        self.require_full_room()?;
        self.started = true;
        self.next_player = Some(Mark::X);
        Ok(())
    }

    /// Place `mark` at `index` and evaluate the board.
    ///
    /// On a terminal result the turn is left as is; otherwise it passes to
    /// the opponent.
    pub fn play(&mut self, index: CellIndex, mark: Mark) -> Result<GameResult, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.require_full_room()?;
        if !self.started {
            return Err(GameError::NotStarted);
        }
        if self.next_player != Some(mark) {
            return Err(GameError::WrongTurn {
                expected: self.next_player,
                actual: mark,
            });
        }
        if self.board.get(index).is_some() {
            return Err(GameError::CellOccupied(index.value()));
        }

        self.board.place(index, mark);
        self.result = check_winner(&self.board);
        if !self.result.is_over() {
            self.next_player = Some(mark.opponent());
        }
        Ok(self.result)
    }

    /// Reset the match, keeping the room code and the players.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.require_full_room()?;
        self.board = Board::new();
        self.result = GameResult::InProgress;
        self.started = false;
        self.next_player = None;
        Ok(())
    }

    fn require_full_room(&self) -> Result<(), GameError> {
        if self.players.len() != MAX_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                required: MAX_PLAYERS,
                current: self.players.len(),
            });
        }
        Ok(())
    }
}
