//! UseCase: ゲーム開始処理

use std::sync::Arc;

use crate::domain::{GameId, GameState, GameStateStore};

use super::error::GameActionError;

/// ゲーム開始のユースケース
pub struct StartGameUseCase {
    store: Arc<dyn GameStateStore>,
}

impl StartGameUseCase {
    /// 新しい StartGameUseCase を作成
    pub fn new(store: Arc<dyn GameStateStore>) -> Self {
        Self { store }
    }

    /// ゲーム開始を実行（X が先手）
    ///
    /// 開始済み、またはプレイヤーが 2 人未満の場合は `Rejected` を返します。
    pub async fn execute(&self, game_id: &GameId) -> Result<GameState, GameActionError> {
        let mut state = self
            .store
            .find(game_id)
            .await?
            .ok_or_else(|| GameActionError::RoomNotFound(game_id.clone()))?;

        state.start()?;
        self.store.save(&state).await?;
        tracing::info!("Game '{}' started", game_id);
        Ok(state)
    }
}
