//! Session coordinator: the game session protocol state machine.
//!
//! Interprets one inbound frame at a time for a connection, runs the matching
//! use case under the room's lock, and fans the resulting state out to every
//! connection registered for the room.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{
        CellIndex, ClientId, ConnectionId, GameError, GameId, GameStateStore, Mark,
        ValueObjectError,
    },
    infrastructure::{
        ConnectionHandle, ConnectionRegistry,
        dto::{ClientAction, FrameError, ServerMessage},
    },
};

use super::{
    CreateGameUseCase, GameActionError, JoinGameUseCase, MakeMoveUseCase, RestartGameUseCase,
    RoomLocks, SessionError, StartGameUseCase,
};

pub const MSG_INVALID_FORMAT: &str = "Invalid message format.";
pub const MSG_INVALID_GAME_ID: &str = "Invalid game ID.";
pub const MSG_GAME_NOT_FOUND: &str = "Game not found";
pub const MSG_GAME_FULL: &str = "Game is full";

/// Owns the connection registry and the per-room locks; shared by all connections.
pub struct SessionCoordinator {
    store: Arc<dyn GameStateStore>,
    registry: ConnectionRegistry,
    locks: RoomLocks,
    room_ttl: Duration,
}

impl SessionCoordinator {
    pub fn new(store: Arc<dyn GameStateStore>, room_ttl: Duration) -> Self {
        Self {
            store,
            registry: ConnectionRegistry::new(),
            locks: RoomLocks::new(),
            room_ttl,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn store(&self) -> Arc<dyn GameStateStore> {
        self.store.clone()
    }

    /// Handle one inbound text frame.
    ///
    /// Rule violations and unusable frames are absorbed here; only internal
    /// failures are returned, and they end the connection.
    pub async fn handle_frame(
        &self,
        connection: &ConnectionHandle,
        client_id: &ClientId,
        text: &str,
    ) -> Result<(), SessionError> {
        let action = match ClientAction::decode(text) {
            Ok(action) => action,
            Err(FrameError::Malformed(reason)) => {
                tracing::warn!("Malformed frame from '{}': {}", client_id, reason);
                reply(connection, ServerMessage::error(MSG_INVALID_FORMAT));
                return Ok(());
            }
            Err(FrameError::Ignored(reason)) => {
                tracing::debug!("Ignored frame from '{}': {}", client_id, reason);
                return Ok(());
            }
        };

        match action {
            ClientAction::CreateGame => self.create_game(connection, client_id).await,
            ClientAction::JoinGame { game_id } => {
                self.join_game(connection, client_id, game_id.as_deref())
                    .await
            }
            ClientAction::StartGame { game_id } => self.start_game(&game_id).await,
            ClientAction::MakeMove {
                game_id,
                index,
                mark,
            } => self.make_move(&game_id, index, mark).await,
            ClientAction::RestartGame { game_id } => self.restart_game(&game_id).await,
        }
    }

    /// Create a room, register the creator's connection and reply to it only.
    pub async fn create_game(
        &self,
        connection: &ConnectionHandle,
        client_id: &ClientId,
    ) -> Result<(), SessionError> {
        let usecase = CreateGameUseCase::new(self.store.clone(), self.room_ttl);
        let state = match usecase.execute(client_id.clone()).await {
            Ok(state) => state,
            Err(e) => return absorb(e),
        };

        self.register(connection, &state.id).await;
        reply(connection, ServerMessage::game_created(&state));
        tracing::info!("Game created: '{}' by '{}'", state.id, client_id);
        Ok(())
    }

    /// Join a room by code; on success every connection in the room gets the new state.
    pub async fn join_game(
        &self,
        connection: &ConnectionHandle,
        client_id: &ClientId,
        raw_game_id: Option<&str>,
    ) -> Result<(), SessionError> {
        // Only a missing code or one of the wrong length is invalid; any other
        // eight-character code just names a room that cannot exist.
        let game_id = match raw_game_id.map(GameId::new) {
            Some(Ok(game_id)) => game_id,
            Some(Err(ValueObjectError::GameIdInvalidCharacter(code))) => {
                tracing::warn!("Client '{}' tried to join missing game '{}'", client_id, code);
                reply(connection, ServerMessage::error(MSG_GAME_NOT_FOUND));
                return Ok(());
            }
            _ => {
                tracing::warn!(
                    "Client '{}' sent invalid game id: {:?}",
                    client_id,
                    raw_game_id
                );
                reply(connection, ServerMessage::error(MSG_INVALID_GAME_ID));
                return Ok(());
            }
        };

        let _guard = self.locks.acquire(&game_id).await;
        let usecase = JoinGameUseCase::new(self.store.clone(), self.room_ttl);
        match usecase.execute(&game_id, client_id.clone()).await {
            Ok(state) => {
                self.register(connection, &game_id).await;
                self.broadcast(&ServerMessage::game_update(&state), &game_id)
                    .await
            }
            Err(GameActionError::RoomNotFound(_)) => {
                tracing::warn!("Client '{}' tried to join missing game '{}'", client_id, game_id);
                reply(connection, ServerMessage::error(MSG_GAME_NOT_FOUND));
                Ok(())
            }
            Err(GameActionError::Rejected(GameError::RoomFull { .. })) => {
                tracing::warn!("Client '{}' tried to join full game '{}'", client_id, game_id);
                reply(connection, ServerMessage::error(MSG_GAME_FULL));
                Ok(())
            }
            Err(e) => absorb(e),
        }
    }

    /// Start a full room. Silently ignored when the room is missing or not startable.
    pub async fn start_game(&self, game_id: &GameId) -> Result<(), SessionError> {
        let _guard = self.locks.acquire(game_id).await;
        let usecase = StartGameUseCase::new(self.store.clone());
        match usecase.execute(game_id).await {
            Ok(state) => {
                self.broadcast(&ServerMessage::game_update(&state), game_id)
                    .await
            }
            Err(e) => absorb(e),
        }
    }

    /// Play a move. Illegal moves are silently dropped.
    pub async fn make_move(
        &self,
        game_id: &GameId,
        index: CellIndex,
        mark: Mark,
    ) -> Result<(), SessionError> {
        let _guard = self.locks.acquire(game_id).await;
        let usecase = MakeMoveUseCase::new(self.store.clone(), self.room_ttl);
        match usecase.execute(game_id, index, mark).await {
            Ok(state) => {
                self.broadcast(&ServerMessage::game_update(&state), game_id)
                    .await
            }
            Err(e) => absorb(e),
        }
    }

    /// Reset a two-player room. Silently ignored otherwise.
    pub async fn restart_game(&self, game_id: &GameId) -> Result<(), SessionError> {
        let _guard = self.locks.acquire(game_id).await;
        let usecase = RestartGameUseCase::new(self.store.clone());
        match usecase.execute(game_id).await {
            Ok(state) => {
                self.broadcast(&ServerMessage::game_restarted(&state), game_id)
                    .await
            }
            Err(e) => absorb(e),
        }
    }

    /// Connection closed: deregister it and tell the rest of the room.
    ///
    /// Stored game state is untouched; the client stays a player and may rejoin.
    pub async fn disconnect(
        &self,
        connection_id: ConnectionId,
        client_id: &ClientId,
    ) -> Result<(), SessionError> {
        let Some(game_id) = self.registry.leave(connection_id).await else {
            return Ok(());
        };
        tracing::info!("Client '{}' disconnected from game '{}'", client_id, game_id);
        self.broadcast(&ServerMessage::player_disconnected(client_id), &game_id)
            .await
    }

    /// Cleanup after an internal failure: deregister without notifying the room.
    pub async fn abandon(&self, connection_id: ConnectionId) {
        if let Some(game_id) = self.registry.leave(connection_id).await {
            tracing::warn!(
                "Connection '{}' dropped from game '{}' after an internal error",
                connection_id,
                game_id
            );
        }
    }

    async fn register(&self, connection: &ConnectionHandle, game_id: &GameId) {
        if let Some(previous) = self.registry.connect(connection.clone(), game_id.clone()).await {
            tracing::debug!(
                "Connection '{}' moved from game '{}' to '{}'",
                connection.id(),
                previous,
                game_id
            );
        }
    }

    async fn broadcast(&self, message: &ServerMessage, game_id: &GameId) -> Result<(), SessionError> {
        let report = self.registry.broadcast(message, game_id).await?;
        tracing::debug!(
            "Broadcast to game '{}': {} delivered, {} failed",
            game_id,
            report.delivered,
            report.failed.len()
        );
        Ok(())
    }
}

/// Send to the originating connection only. A closed connection is already
/// tearing down, so failure is just logged.
fn reply(connection: &ConnectionHandle, message: ServerMessage) {
    if let Err(e) = connection.send(&message) {
        tracing::warn!("Failed to reply to connection '{}': {}", connection.id(), e);
    }
}

/// Drop rule violations and missing rooms; surface everything else.
fn absorb(error: GameActionError) -> Result<(), SessionError> {
    match error {
        GameActionError::RoomNotFound(game_id) => {
            tracing::debug!("Ignored action for missing game '{}'", game_id);
            Ok(())
        }
        GameActionError::Rejected(reason) => {
            tracing::debug!("Ignored action: {}", reason);
            Ok(())
        }
        GameActionError::Store(e) => {
            tracing::error!("Game state store failure: {}", e);
            Err(SessionError::Store(e))
        }
        GameActionError::RoomCodeUnavailable => {
            tracing::error!("Could not allocate a room code");
            Err(SessionError::RoomCodeUnavailable)
        }
    }
}
