//! UseCase: 着手処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MakeMoveUseCase::execute() メソッド
//! - 着手の検証、勝敗判定、終局時の有効期限設定
//!
//! ### なぜこのテストが必要か
//! - 不正な着手で状態が変わってはならない
//! - 終局したルームは TTL で回収される必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：手番交代、勝利、引き分け
//! - 異常系：手番違い、埋まったマス、未開始、終局後の着手、存在しないルーム

use std::{sync::Arc, time::Duration};

use crate::domain::{CellIndex, GameId, GameState, GameStateStore, Mark};

use super::error::GameActionError;

/// 着手のユースケース
pub struct MakeMoveUseCase {
    /// Store（データアクセス層の抽象化）
    store: Arc<dyn GameStateStore>,
    room_ttl: Duration,
}

impl MakeMoveUseCase {
    /// 新しい MakeMoveUseCase を作成
    pub fn new(store: Arc<dyn GameStateStore>, room_ttl: Duration) -> Self {
        Self { store, room_ttl }
    }

    /// 着手を実行
    ///
    /// # Arguments
    ///
    /// * `game_id` - 対象ルーム
    /// * `index` - 着手するマス
    /// * `mark` - 着手するプレイヤーのマーク
    ///
    /// # Returns
    ///
    /// * `Ok(GameState)` - 着手後のゲーム状態（終局時は winner が設定済み）
    /// * `Err(GameActionError)` - ルームが存在しない、またはルール違反
    pub async fn execute(
        &self,
        game_id: &GameId,
        index: CellIndex,
        mark: Mark,
    ) -> Result<GameState, GameActionError> {
        let mut state = self
            .store
            .find(game_id)
            .await?
            .ok_or_else(|| GameActionError::RoomNotFound(game_id.clone()))?;

        let result = state.play(index, mark)?;
        self.store.save(&state).await?;
        if result.is_over() {
            self.store.expire(game_id, self.room_ttl).await?;
            tracing::info!("Game '{}' finished: {:?}", game_id, result);
        } else {
            tracing::debug!("Game '{}': {} played {}", game_id, mark, index);
        }
        Ok(state)
    }
}
