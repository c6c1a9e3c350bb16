//! UseCase: ゲームのリスタート処理

use std::sync::Arc;

use crate::domain::{GameId, GameState, GameStateStore};

use super::error::GameActionError;

/// リスタートのユースケース
pub struct RestartGameUseCase {
    store: Arc<dyn GameStateStore>,
}

impl RestartGameUseCase {
    /// 新しい RestartGameUseCase を作成
    pub fn new(store: Arc<dyn GameStateStore>) -> Self {
        Self { store }
    }

    /// リスタートを実行
    ///
    /// 盤面と勝敗をリセットし、ルームの有効期限を解除します。
    /// プレイヤーが 2 人でない場合は `Rejected` を返します。
    pub async fn execute(&self, game_id: &GameId) -> Result<GameState, GameActionError> {
        let mut state = self
            .store
            .find(game_id)
            .await?
            .ok_or_else(|| GameActionError::RoomNotFound(game_id.clone()))?;

        state.restart()?;
        self.store.save(&state).await?;
        self.store.persist(game_id).await?;
        tracing::info!("Game '{}' restarted", game_id);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{CellIndex, ClientId, GameError, GameResult, Mark, repository::MockGameStateStore},
        infrastructure::InMemoryGameStateStore,
        usecase::DEFAULT_ROOM_TTL,
    };

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    fn finished_state() -> GameState {
        let mut state = GameState::new(GameId::new("abcd1234").unwrap(), client("alice"));
        state.join(client("bob")).unwrap();
        state.start().unwrap();
        for (i, mark) in [(0, Mark::X), (3, Mark::O), (1, Mark::X), (4, Mark::O), (2, Mark::X)] {
            state.play(CellIndex::new(i).unwrap(), mark).unwrap();
        }
        state
    }

    #[tokio::test]
    async fn test_restart_resets_and_clears_ttl() {
        // テスト項目: リスタートで盤面が初期化され、TTL が解除される
        // given (前提条件):
        let store = Arc::new(InMemoryGameStateStore::new());
        let finished = finished_state();
        store.save(&finished).await.unwrap();
        store.expire(&finished.id, DEFAULT_ROOM_TTL).await.unwrap();
        let usecase = RestartGameUseCase::new(store.clone());

        // when (操作):
        let state = usecase.execute(&finished.id).await.unwrap();

        // then (期待する結果):
        assert!(state.board.is_empty());
        assert_eq!(state.result, GameResult::InProgress);
        assert_eq!(state.next_player, None);
        assert!(!state.started);
        assert_eq!(state.players, finished.players);
        assert_eq!(state.id, finished.id);
        assert_eq!(store.ttl(&finished.id).await, None);
        assert_eq!(store.find(&finished.id).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_restart_with_one_player_is_rejected() {
        // テスト項目: プレイヤーが 1 人のルームはリスタートできない
        // given (前提条件):
        let single = GameState::new(GameId::new("abcd1234").unwrap(), client("alice"));
        let mut store = MockGameStateStore::new();
        store
            .expect_find()
            .returning(move |_| Ok(Some(single.clone())));
        store.expect_save().never();
        store.expect_persist().never();
        let usecase = RestartGameUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase.execute(&GameId::new("abcd1234").unwrap()).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(GameActionError::Rejected(GameError::NotEnoughPlayers { .. }))
        ));
    }

    #[tokio::test]
    async fn test_restart_persists_after_save() {
        // テスト項目: 保存の後に persist が呼ばれる
        // given (前提条件):
        let finished = finished_state();
        let mut store = MockGameStateStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_find()
            .returning(move |_| Ok(Some(finished.clone())));
        store
            .expect_save()
            .withf(|state: &GameState| state.board.is_empty() && !state.started)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_persist()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let usecase = RestartGameUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase.execute(&GameId::new("abcd1234").unwrap()).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
