//! UseCase 層
//!
//! ゲームのアクションごとのビジネスロジックを実装するレイヤー。
//! UI 層から `SessionCoordinator` 経由で呼び出され、Domain 層を操作します。

pub mod create_game;
pub mod error;
pub mod join_game;
pub mod make_move;
pub mod restart_game;
pub mod room_locks;
pub mod session_coordinator;
pub mod start_game;

pub use create_game::CreateGameUseCase;
pub use error::{GameActionError, SessionError};
pub use join_game::JoinGameUseCase;
pub use make_move::MakeMoveUseCase;
pub use restart_game::RestartGameUseCase;
pub use room_locks::RoomLocks;
pub use session_coordinator::SessionCoordinator;
pub use start_game::StartGameUseCase;

/// Default lifetime of an empty or finished room in the store (15 minutes)
pub const DEFAULT_ROOM_TTL: std::time::Duration = std::time::Duration::from_secs(900);
