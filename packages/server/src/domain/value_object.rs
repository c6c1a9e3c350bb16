//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a client identifier
pub const CLIENT_ID_MAX_LEN: usize = 100;

/// Exact length of a room code
pub const GAME_ID_LEN: usize = 8;

/// Client identifier value object.
///
/// Opaque identifier supplied by the client when the connection is
/// established. It identifies a player across reconnects within a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new ClientId.
    ///
    /// # Arguments
    ///
    /// * `id` - The client identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the ClientId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ClientIdEmpty);
        }
        let len = id.chars().count();
        if len > CLIENT_ID_MAX_LEN {
            return Err(ValueObjectError::ClientIdTooLong {
                max: CLIENT_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room code value object.
///
/// Eight lowercase alphanumeric characters. Input is lowercased before
/// validation, so room codes are case-insensitive for clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    /// Create a new GameId from client input.
    pub fn new(id: &str) -> Result<Self, ValueObjectError> {
        let id = id.to_lowercase();
        let len = id.chars().count();
        if len != GAME_ID_LEN {
            return Err(ValueObjectError::GameIdInvalidLength {
                expected: GAME_ID_LEN,
                actual: len,
            });
        }
        if !id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(ValueObjectError::GameIdInvalidCharacter(id));
        }
        Ok(Self(id))
    }

    /// Derive a room code from the first characters of a UUID.
    pub fn from_uuid(uuid: Uuid) -> Result<Self, ValueObjectError> {
        let simple = uuid.simple().to_string();
        Self::new(&simple[..GAME_ID_LEN])
    }

    /// Key under which the room's state document is stored.
    pub fn store_key(&self) -> String {
        format!("game:{}", self.0)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark that plays after this one.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl TryFrom<&str> for Mark {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "X" => Ok(Mark::X),
            "O" => Ok(Mark::O),
            other => Err(ValueObjectError::MarkInvalid(other.to_string())),
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board position in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex(usize);

impl CellIndex {
    pub const MAX: usize = 8;

    pub fn new(index: i64) -> Result<Self, ValueObjectError> {
        match usize::try_from(index) {
            Ok(i) if i <= Self::MAX => Ok(Self(i)),
            _ => Err(ValueObjectError::CellIndexOutOfRange {
                max: Self::MAX,
                actual: index,
            }),
        }
    }

    pub fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one live connection.
///
/// Two connections from the same client are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
