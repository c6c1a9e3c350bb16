//! WebSocket message DTOs for the game session protocol.
//!
//! Inbound frames are decoded once into [`ClientAction`]; every outbound frame
//! is a [`ServerMessage`]. [`GameStateDto`] is also the document format kept in
//! the game state store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    BOARD_SIZE, Board, CellIndex, ClientId, GameId, GameResult, GameState, MAX_PLAYERS, Mark,
};

const DRAW: &str = "Draw";

/// Wire representation of a room's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    pub game_id: String,
    /// Nine cells, `""` for empty
    pub board: Vec<String>,
    pub next_player: Option<String>,
    /// `"X"`, `"O"` or `"Draw"`
    pub winner: Option<String>,
    pub win_condition: Option<[usize; 3]>,
    pub players: Vec<String>,
    pub started: bool,
}

impl From<&GameState> for GameStateDto {
    fn from(state: &GameState) -> Self {
        let (winner, win_condition) = match state.result {
            GameResult::InProgress => (None, None),
            GameResult::Draw => (Some(DRAW.to_string()), None),
            GameResult::Won { mark, line } => (Some(mark.to_string()), Some(line)),
        };
        Self {
            game_id: state.id.as_str().to_string(),
            board: state
                .board
                .cells()
                .iter()
                .map(|cell| cell.map(|m| m.to_string()).unwrap_or_default())
                .collect(),
            next_player: state.next_player.map(|m| m.to_string()),
            winner,
            win_condition,
            players: state
                .players
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            started: state.started,
        }
    }
}

impl TryFrom<GameStateDto> for GameState {
    type Error = String;

    fn try_from(dto: GameStateDto) -> Result<Self, Self::Error> {
        let id = GameId::new(&dto.game_id).map_err(|e| e.to_string())?;

        if dto.board.len() != BOARD_SIZE {
            return Err(format!(
                "board must have {BOARD_SIZE} cells (got {})",
                dto.board.len()
            ));
        }
        let mut cells = [None; BOARD_SIZE];
        for (cell, raw) in cells.iter_mut().zip(&dto.board) {
            if !raw.is_empty() {
                *cell = Some(Mark::try_from(raw.as_str()).map_err(|e| e.to_string())?);
            }
        }

        if dto.players.len() > MAX_PLAYERS {
            return Err(format!(
                "at most {MAX_PLAYERS} players allowed (got {})",
                dto.players.len()
            ));
        }
        let mut players: Vec<ClientId> = Vec::with_capacity(dto.players.len());
        for raw in dto.players {
            let player = ClientId::new(raw).map_err(|e| e.to_string())?;
            if players.contains(&player) {
                return Err(format!("duplicate player '{player}'"));
            }
            players.push(player);
        }

        let next_player = dto
            .next_player
            .as_deref()
            .map(Mark::try_from)
            .transpose()
            .map_err(|e| e.to_string())?;

        let result = match (dto.winner.as_deref(), dto.win_condition) {
            (None, _) => GameResult::InProgress,
            (Some(DRAW), _) => GameResult::Draw,
            (Some(raw), Some(line)) => {
                if line.iter().any(|&i| i >= BOARD_SIZE) {
                    return Err(format!("win condition out of range: {line:?}"));
                }
                let mark = Mark::try_from(raw).map_err(|e| e.to_string())?;
                GameResult::Won { mark, line }
            }
            (Some(raw), None) => return Err(format!("winner '{raw}' without win condition")),
        };

        Ok(GameState {
            id,
            board: Board::from_cells(cells),
            players,
            started: dto.started,
            next_player,
            result,
        })
    }
}

/// Messages sent from server to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to the creator only
    GameCreated { state: GameStateDto },
    GameUpdate { state: GameStateDto },
    GameRestarted { state: GameStateDto },
    PlayerDisconnected { client_id: String },
    Error { message: String },
}

impl ServerMessage {
    pub fn game_created(state: &GameState) -> Self {
        Self::GameCreated {
            state: state.into(),
        }
    }

    pub fn game_update(state: &GameState) -> Self {
        Self::GameUpdate {
            state: state.into(),
        }
    }

    pub fn game_restarted(state: &GameState) -> Self {
        Self::GameRestarted {
            state: state.into(),
        }
    }

    pub fn player_disconnected(client_id: &ClientId) -> Self {
        Self::PlayerDisconnected {
            client_id: client_id.as_str().to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// One inbound action, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    CreateGame,
    /// The room code stays raw here: an invalid code is reported to the client
    JoinGame { game_id: Option<String> },
    StartGame { game_id: GameId },
    MakeMove {
        game_id: GameId,
        index: CellIndex,
        mark: Mark,
    },
    RestartGame { game_id: GameId },
}

/// Why an inbound frame did not yield an action
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Not a JSON object; the sender gets an error reply
    #[error("Invalid message format.")]
    Malformed(String),

    /// Well-formed but unusable; dropped without reply
    #[error("Ignored frame: {0}")]
    Ignored(String),
}

#[derive(Debug, Deserialize)]
struct RawClientMessage {
    action: Option<Value>,
    game_id: Option<Value>,
    index: Option<Value>,
    player_symbol: Option<Value>,
}

impl ClientAction {
    /// Decode a text frame.
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| FrameError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(FrameError::Malformed("frame is not a JSON object".to_string()));
        }
        let raw: RawClientMessage =
            serde_json::from_value(value).map_err(|e| FrameError::Malformed(e.to_string()))?;

        let action = raw
            .action
            .as_ref()
            .and_then(Value::as_str)
            .ok_or_else(|| FrameError::Ignored("missing action".to_string()))?;
        let game_id = raw.game_id.as_ref().and_then(Value::as_str);

        match action {
            "create_game" => Ok(Self::CreateGame),
            "join_game" => Ok(Self::JoinGame {
                game_id: game_id.map(str::to_string),
            }),
            "start_game" => Ok(Self::StartGame {
                game_id: parse_game_id(game_id)?,
            }),
            "make_move" => {
                let game_id = parse_game_id(game_id)?;
                let index = raw
                    .index
                    .as_ref()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| FrameError::Ignored("index is not an integer".to_string()))
                    .and_then(|i| {
                        CellIndex::new(i).map_err(|e| FrameError::Ignored(e.to_string()))
                    })?;
                let mark = raw
                    .player_symbol
                    .as_ref()
                    .and_then(Value::as_str)
                    .ok_or_else(|| FrameError::Ignored("missing player_symbol".to_string()))
                    .and_then(|s| Mark::try_from(s).map_err(|e| FrameError::Ignored(e.to_string())))?;
                Ok(Self::MakeMove {
                    game_id,
                    index,
                    mark,
                })
            }
            "restart_game" => Ok(Self::RestartGame {
                game_id: parse_game_id(game_id)?,
            }),
            other => Err(FrameError::Ignored(format!("unknown action '{other}'"))),
        }
    }
}

fn parse_game_id(raw: Option<&str>) -> Result<GameId, FrameError> {
    let raw = raw.ok_or_else(|| FrameError::Ignored("missing game_id".to_string()))?;
    GameId::new(raw).map_err(|e| FrameError::Ignored(e.to_string()))
}
