//! Redis GameStateStore 実装
//!
//! `redis` クレートの `ConnectionManager` を使用します。再接続は
//! ConnectionManager に任せ、コマンドごとに安価なクローンを取得します。

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use super::{decode_state, encode_state};
use crate::domain::{GameId, GameState, GameStateStore, StoreError};

/// Redis-backed store: `SET`, `GET`, `EXPIRE` and `PERSIST` on `game:{gameId}`.
#[derive(Clone)]
pub struct RedisGameStateStore {
    connection: ConnectionManager,
}

impl RedisGameStateStore {
    /// Connect to Redis at `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)
            .map_err(|err| StoreError::Backend(format!("Invalid REDIS_URL: {err}")))?;
        let connection = ConnectionManager::new(client).await.map_err(|err| {
            StoreError::Backend(format!(
                "Unable to initialize Redis connection manager: {err}"
            ))
        })?;
        tracing::info!("Connected to Redis game state store");
        Ok(Self { connection })
    }
}

fn backend(err: redis::RedisError) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl GameStateStore for RedisGameStateStore {
    async fn save(&self, state: &GameState) -> Result<(), StoreError> {
        let document = encode_state(state)?;
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(state.id.store_key(), document)
            .await
            .map_err(backend)
    }

    async fn find(&self, game_id: &GameId) -> Result<Option<GameState>, StoreError> {
        let key = game_id.store_key();
        let mut conn = self.connection.clone();
        let document = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(backend)?;
        document.map(|doc| decode_state(&key, &doc)).transpose()
    }

    async fn expire(&self, game_id: &GameId, ttl: Duration) -> Result<(), StoreError> {
        let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let mut conn = self.connection.clone();
        conn.expire::<_, ()>(game_id.store_key(), seconds)
            .await
            .map_err(backend)
    }

    async fn persist(&self, game_id: &GameId) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        conn.persist::<_, ()>(game_id.store_key())
            .await
            .map_err(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        // テスト項目: 不正な URL では接続に失敗する
        // when (操作):
        let result = RedisGameStateStore::connect("not-a-redis-url").await;

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::Backend(msg)) if msg.contains("Invalid REDIS_URL")));
    }
}
