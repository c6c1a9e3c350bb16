//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGameUseCase::execute() メソッド
//! - 参加処理（存在チェック、定員チェック、再参加の冪等性）
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人目の参加、既存メンバーの再参加
//! - 異常系：存在しないルーム、満員のルーム

use std::{sync::Arc, time::Duration};

use crate::domain::{ClientId, GameId, GameState, GameStateStore};

use super::error::GameActionError;

/// ルーム参加のユースケース
pub struct JoinGameUseCase {
    /// Store（データアクセス層の抽象化）
    store: Arc<dyn GameStateStore>,
    room_ttl: Duration,
}

impl JoinGameUseCase {
    /// 新しい JoinGameUseCase を作成
    pub fn new(store: Arc<dyn GameStateStore>, room_ttl: Duration) -> Self {
        Self { store, room_ttl }
    }

    /// ルーム参加を実行
    ///
    /// 既存メンバーの再参加では players は変化しませんが、状態は保存し直されます。
    /// 相手待ちまたは終局済みのルームは有効期限が再設定されます。
    ///
    /// # Returns
    ///
    /// * `Ok(GameState)` - 参加後のゲーム状態
    /// * `Err(GameActionError::RoomNotFound)` - ルームが存在しない
    /// * `Err(GameActionError::Rejected(GameError::RoomFull))` - 満員
    pub async fn execute(
        &self,
        game_id: &GameId,
        client_id: ClientId,
    ) -> Result<GameState, GameActionError> {
        let mut state = self
            .store
            .find(game_id)
            .await?
            .ok_or_else(|| GameActionError::RoomNotFound(game_id.clone()))?;

        let added = state.join(client_id.clone())?;
        if added {
            tracing::info!("Client '{}' joined game '{}'", client_id, game_id);
        } else {
            tracing::info!("Client '{}' rejoined game '{}'", client_id, game_id);
        }

        self.store.save(&state).await?;
        if state.is_reclaimable() {
            self.store.expire(game_id, self.room_ttl).await?;
        }
        Ok(state)
    }
}
