//! InMemory GameStateStore 実装
//!
//! HashMap をインメモリ KVS として使用し、キーごとの有効期限を模倣します。
//! 期限切れのエントリは読み出し時に削除され、書き込みのたびに全体からも掃除されます。

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};

use super::{decode_state, encode_state};
use crate::domain::{GameId, GameState, GameStateStore, StoreError};

struct Entry {
    document: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// インメモリ GameStateStore 実装
///
/// 単一プロセスでの運用とテストで使用します。
#[derive(Default)]
pub struct InMemoryGameStateStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryGameStateStore {
    /// 新しい InMemoryGameStateStore を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 残り有効期限を取得（期限なし・存在しない場合は None）
    pub async fn ttl(&self, game_id: &GameId) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries
            .get(&game_id.store_key())
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.expires_at)
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// 保存されている生の JSON ドキュメントを取得
    pub async fn raw_document(&self, game_id: &GameId) -> Option<String> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries
            .get(&game_id.store_key())
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.document.clone())
    }

    /// 有効なエントリ数をカウント
    pub async fn count_live(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| !e.is_expired(now)).count()
    }
}

#[async_trait]
impl GameStateStore for InMemoryGameStateStore {
    async fn save(&self, state: &GameState) -> Result<(), StoreError> {
        let document = encode_state(state)?;
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        // Sweep rooms nobody reads again
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            state.id.store_key(),
            Entry {
                document,
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn find(&self, game_id: &GameId) -> Result<Option<GameState>, StoreError> {
        let key = game_id.store_key();
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get(&key) else {
            return Ok(None);
        };
        if entry.is_expired(Instant::now()) {
            entries.remove(&key);
            tracing::debug!("Game '{}' expired", game_id);
            return Ok(None);
        }
        decode_state(&key, &entry.document).map(Some)
    }

    async fn expire(&self, game_id: &GameId, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(&game_id.store_key())
            && !entry.is_expired(now)
        {
            entry.expires_at = Some(now + ttl);
        }
        Ok(())
    }

    async fn persist(&self, game_id: &GameId) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(&game_id.store_key())
            && !entry.is_expired(now)
        {
            entry.expires_at = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClientId;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryGameStateStore の保存・取得
    // - 有効期限（expire / persist / save によるクリア）の模倣
    //
    // 【なぜこのテストが必要か】
    // - UseCase 層は TTL の設定・解除を Store に委ねている
    // - Redis と同じ意味論でなければテストの前提が崩れる
    // ========================================

    fn game(id: &str) -> GameState {
        GameState::new(
            GameId::new(id).unwrap(),
            ClientId::new("alice".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        // テスト項目: 保存した状態を取得できる
        // given (前提条件):
        let store = InMemoryGameStateStore::new();
        let state = game("abcd1234");

        // when (操作):
        store.save(&state).await.unwrap();
        let found = store.find(&state.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(found, Some(state.clone()));
        assert!(
            store
                .raw_document(&state.id)
                .await
                .unwrap()
                .contains("\"gameId\":\"abcd1234\"")
        );
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        // テスト項目: 存在しないルームは None
        // given (前提条件):
        let store = InMemoryGameStateStore::new();

        // then (期待する結果):
        let result = store.find(&GameId::new("zzzz9999").unwrap()).await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_removes_entry_after_ttl() {
        // テスト項目: TTL 経過後はエントリが消える
        // given (前提条件):
        let store = InMemoryGameStateStore::new();
        let state = game("abcd1234");
        store.save(&state).await.unwrap();

        // when (操作):
        store
            .expire(&state.id, Duration::from_secs(900))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(store.ttl(&state.id).await, Some(Duration::from_secs(900)));
        tokio::time::advance(Duration::from_secs(899)).await;
        assert!(store.find(&state.id).await.unwrap().is_some());
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(store.find(&state.id).await.unwrap().is_none());
        assert_eq!(store.count_live().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persist_clears_expiration() {
        // テスト項目: persist で有効期限が解除される
        // given (前提条件):
        let store = InMemoryGameStateStore::new();
        let state = game("abcd1234");
        store.save(&state).await.unwrap();
        store
            .expire(&state.id, Duration::from_secs(10))
            .await
            .unwrap();

        // when (操作):
        store.persist(&state.id).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;

        // then (期待する結果):
        assert_eq!(store.ttl(&state.id).await, None);
        assert!(store.find(&state.id).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_clears_expiration() {
        // テスト項目: save は Redis の SET と同様に有効期限をクリアする
        // given (前提条件):
        let store = InMemoryGameStateStore::new();
        let state = game("abcd1234");
        store.save(&state).await.unwrap();
        store
            .expire(&state.id, Duration::from_secs(10))
            .await
            .unwrap();

        // when (操作):
        store.save(&state).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.ttl(&state.id).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_sweeps_expired_entries() {
        // テスト項目: 一度も読まれない期限切れのルームも次の save で削除される
        // given (前提条件):
        let store = InMemoryGameStateStore::new();
        for i in 0..100 {
            let state = game(&format!("{i:08}"));
            store.save(&state).await.unwrap();
            store
                .expire(&state.id, Duration::from_secs(900))
                .await
                .unwrap();
        }
        tokio::time::advance(Duration::from_secs(3600)).await;

        // when (操作):
        store.save(&game("abcd1234")).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.entries.lock().await.len(), 1);
        assert_eq!(store.count_live().await, 1);
    }

    #[tokio::test]
    async fn test_expire_missing_key_is_noop() {
        // テスト項目: 存在しないキーへの expire / persist はエラーにならない
        // given (前提条件):
        let store = InMemoryGameStateStore::new();
        let game_id = GameId::new("abcd1234").unwrap();

        // then (期待する結果):
        assert!(store.expire(&game_id, Duration::from_secs(1)).await.is_ok());
        assert!(store.persist(&game_id).await.is_ok());
        assert_eq!(store.count_live().await, 0);
    }
}
