//! Route table.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_game_detail, health_check, websocket_handler},
    state::AppState,
};

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws/{client_id}", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/games/{game_id}", get(get_game_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
