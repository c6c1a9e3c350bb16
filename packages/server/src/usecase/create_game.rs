//! UseCase: ゲーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateGameUseCase::execute() メソッド
//! - 新しいルームの初期状態と Store への保存、有効期限の設定
//!
//! ### なぜこのテストが必要か
//! - 放置された空ルームは TTL で回収される必要がある
//! - ルームコードの衝突時に既存ルームを上書きしてはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームの作成
//! - 異常系：Store の障害
//! - エッジケース：生成したルームコードが既存ルームと衝突

use std::{sync::Arc, time::Duration};

use crate::domain::{ClientId, GameIdFactory, GameState, GameStateStore};

use super::error::GameActionError;

/// Attempts at finding an unused room code
const MAX_CODE_ATTEMPTS: usize = 5;

/// ゲーム作成のユースケース
pub struct CreateGameUseCase {
    /// Store（データアクセス層の抽象化）
    store: Arc<dyn GameStateStore>,
    room_ttl: Duration,
}

impl CreateGameUseCase {
    /// 新しい CreateGameUseCase を作成
    pub fn new(store: Arc<dyn GameStateStore>, room_ttl: Duration) -> Self {
        Self { store, room_ttl }
    }

    /// ゲーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `creator` - ルームを作成するクライアントの ID（最初のプレイヤーになる）
    ///
    /// # Returns
    ///
    /// * `Ok(GameState)` - 保存済みの新しいゲーム状態
    /// * `Err(GameActionError)` - 作成失敗
    pub async fn execute(&self, creator: ClientId) -> Result<GameState, GameActionError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let game_id =
                GameIdFactory::generate().map_err(|_| GameActionError::RoomCodeUnavailable)?;
            if self.store.find(&game_id).await?.is_some() {
                tracing::warn!("Room code '{}' already in use, regenerating", game_id);
                continue;
            }

            let state = GameState::new(game_id, creator);
            self.store.save(&state).await?;
            self.store.expire(&state.id, self.room_ttl).await?;
            return Ok(state);
        }
        Err(GameActionError::RoomCodeUnavailable)
    }
}
