//! Process-local registry of live connections per room.
//!
//! A connection belongs to at most one room at a time. Handles are only used to
//! dispatch frames; dropping one never touches stored game state.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::{
    domain::{ConnectionId, GameId},
    infrastructure::dto::ServerMessage,
};

/// Errors while delivering a frame to one connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to encode outbound message: {0}")]
    Encode(String),

    /// The connection's writer has gone away
    #[error("Connection '{0}' is closed")]
    Closed(ConnectionId),
}

/// Sending half of one live connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: UnboundedSender<String>,
}

impl ConnectionHandle {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue an already-encoded text frame.
    pub fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.sender
            .send(text)
            .map_err(|_| TransportError::Closed(self.id))
    }

    /// Encode and queue a message for this connection only.
    pub fn send(&self, message: &ServerMessage) -> Result<(), TransportError> {
        let text = encode(message)?;
        self.send_text(text)
    }
}

fn encode(message: &ServerMessage) -> Result<String, TransportError> {
    serde_json::to_string(message).map_err(|e| TransportError::Encode(e.to_string()))
}

/// Result of a broadcast
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Connections whose writer is gone; their own teardown deregisters them
    pub failed: Vec<ConnectionId>,
}

#[derive(Default)]
struct RegistryInner {
    rooms: HashMap<GameId, Vec<ConnectionHandle>>,
    memberships: HashMap<ConnectionId, GameId>,
}

impl RegistryInner {
    fn remove(&mut self, connection_id: ConnectionId, game_id: &GameId) -> bool {
        let removed = match self.rooms.get_mut(game_id) {
            Some(connections) => {
                let before = connections.len();
                connections.retain(|c| c.id() != connection_id);
                connections.len() != before
            }
            None => false,
        };
        if self.memberships.get(&connection_id) == Some(game_id) {
            self.memberships.remove(&connection_id);
        }
        removed
    }
}

/// Mapping from room to its live connections, in registration order
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: Mutex<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `game_id`.
    ///
    /// A connection already registered in another room is moved; the previous
    /// room is returned. Registering twice in the same room is a no-op.
    pub async fn connect(&self, handle: ConnectionHandle, game_id: GameId) -> Option<GameId> {
        let mut inner = self.inner.lock().await;
        let id = handle.id();

        let previous = match inner.memberships.get(&id) {
            Some(current) if current != &game_id => Some(current.clone()),
            _ => None,
        };
        if let Some(previous) = &previous
            && let Some(connections) = inner.rooms.get_mut(previous)
        {
            connections.retain(|c| c.id() != id);
        }

        let connections = inner.rooms.entry(game_id.clone()).or_default();
        if !connections.iter().any(|c| c.id() == id) {
            connections.push(handle);
        }
        inner.memberships.insert(id, game_id);
        previous
    }

    /// Remove a connection from a room. Returns whether it was registered there.
    ///
    /// The room's (possibly empty) list is kept.
    pub async fn disconnect(&self, connection_id: ConnectionId, game_id: &GameId) -> bool {
        let mut inner = self.inner.lock().await;
        inner.remove(connection_id, game_id)
    }

    /// Remove a connection from whatever room it is in.
    pub async fn leave(&self, connection_id: ConnectionId) -> Option<GameId> {
        let mut inner = self.inner.lock().await;
        let game_id = inner.memberships.get(&connection_id)?.clone();
        inner.remove(connection_id, &game_id);
        Some(game_id)
    }

    pub async fn room_of(&self, connection_id: ConnectionId) -> Option<GameId> {
        let inner = self.inner.lock().await;
        inner.memberships.get(&connection_id).cloned()
    }

    pub async fn connection_count(&self, game_id: &GameId) -> usize {
        let inner = self.inner.lock().await;
        inner.rooms.get(game_id).map_or(0, Vec::len)
    }

    /// Send `message` to every connection in the room, in registration order.
    ///
    /// The message is encoded once. A failed send is logged and skipped; the
    /// remaining connections still receive the frame.
    pub async fn broadcast(
        &self,
        message: &ServerMessage,
        game_id: &GameId,
    ) -> Result<BroadcastReport, TransportError> {
        let text = encode(message)?;
        let inner = self.inner.lock().await;
        let mut report = BroadcastReport::default();

        let Some(connections) = inner.rooms.get(game_id) else {
            return Ok(report);
        };
        for connection in connections {
            match connection.send_text(text.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Broadcast to room '{}' skipped: {}", game_id, e);
                    report.failed.push(connection.id());
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn game(id: &str) -> GameId {
        GameId::new(id).unwrap()
    }

    fn handle() -> (ConnectionHandle, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle::new(tx), rx)
    }

    #[tokio::test]
    async fn test_connect_is_deduplicated() {
        // テスト項目: 同じ接続を 2 回登録しても 1 件のまま
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = handle();

        // when (操作):
        registry.connect(conn.clone(), game("room0001")).await;
        registry.connect(conn.clone(), game("room0001")).await;

        // then (期待する結果):
        assert_eq!(registry.connection_count(&game("room0001")).await, 1);
        assert_eq!(registry.room_of(conn.id()).await, Some(game("room0001")));
    }

    #[tokio::test]
    async fn test_connect_moves_between_rooms() {
        // テスト項目: 別のルームに登録すると元のルームから外れる
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = handle();
        registry.connect(conn.clone(), game("room0001")).await;

        // when (操作):
        let previous = registry.connect(conn.clone(), game("room0002")).await;

        // then (期待する結果):
        assert_eq!(previous, Some(game("room0001")));
        assert_eq!(registry.connection_count(&game("room0001")).await, 0);
        assert_eq!(registry.connection_count(&game("room0002")).await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_removes_connection() {
        // テスト項目: 切断で登録が外れ、存在しない接続の切断は false
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = handle();
        registry.connect(conn.clone(), game("room0001")).await;

        // when (操作):
        let first = registry.disconnect(conn.id(), &game("room0001")).await;
        let second = registry.disconnect(conn.id(), &game("room0001")).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(registry.room_of(conn.id()).await, None);
        assert_eq!(registry.leave(conn.id()).await, None);
    }

    #[tokio::test]
    async fn test_leave_removes_from_current_room() {
        // テスト項目: leave は現在のルームから外し、そのルームを返す
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = handle();
        let (other, _other_rx) = handle();
        registry.connect(conn.clone(), game("room0001")).await;
        registry.connect(other.clone(), game("room0001")).await;

        // when (操作):
        let left = registry.leave(conn.id()).await;

        // then (期待する結果):
        assert_eq!(left, Some(game("room0001")));
        assert_eq!(registry.room_of(conn.id()).await, None);
        assert_eq!(registry.connection_count(&game("room0001")).await, 1);
        assert_eq!(registry.room_of(other.id()).await, Some(game("room0001")));
    }

    #[tokio::test]
    async fn test_broadcast_in_registration_order() {
        // テスト項目: ルーム内の全接続に登録順で配信され、他のルームには届かない
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (alice, mut alice_rx) = handle();
        let (bob, mut bob_rx) = handle();
        let (other, mut other_rx) = handle();
        registry.connect(alice, game("room0001")).await;
        registry.connect(bob, game("room0001")).await;
        registry.connect(other, game("room0002")).await;

        // when (操作):
        let report = registry
            .broadcast(&ServerMessage::error("hello"), &game("room0001"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert!(report.failed.is_empty());
        let expected = r#"{"type":"error","message":"hello"}"#;
        assert_eq!(alice_rx.try_recv().unwrap(), expected);
        assert_eq!(bob_rx.try_recv().unwrap(), expected);
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_isolates_closed_connection() {
        // テスト項目: 閉じた接続への送信失敗が他の接続への配信を妨げない
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (closed, closed_rx) = handle();
        let (alive, mut alive_rx) = handle();
        registry.connect(closed.clone(), game("room0001")).await;
        registry.connect(alive, game("room0001")).await;
        drop(closed_rx);

        // when (操作):
        let report = registry
            .broadcast(&ServerMessage::error("still here"), &game("room0001"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, vec![closed.id()]);
        assert!(alive_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room_is_empty() {
        // テスト項目: 未登録のルームへの配信は何もしない
        // given (前提条件):
        let registry = ConnectionRegistry::new();

        // when (操作):
        let report = registry
            .broadcast(&ServerMessage::error("nobody"), &game("room0009"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }
}
