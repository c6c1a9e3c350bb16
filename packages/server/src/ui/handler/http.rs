//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::GameId,
    infrastructure::dto::http::{GameDetailDto, HealthDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Get the stored state of one room
pub async fn get_game_detail(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameDetailDto>, StatusCode> {
    let game_id = GameId::new(&game_id).map_err(|_| StatusCode::NOT_FOUND)?;

    let game = state
        .coordinator
        .store()
        .find(&game_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load game '{}': {}", game_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let connections = state
        .coordinator
        .registry()
        .connection_count(&game_id)
        .await;

    Ok(Json(GameDetailDto {
        state: (&game).into(),
        connections,
    }))
}
