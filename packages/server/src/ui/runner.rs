//! Server startup.

use std::sync::Arc;

use tokio::net::TcpListener;

use super::{router::create_router, signal::shutdown_signal, state::AppState};
use crate::{
    config::{ServerConfig, StoreBackend},
    domain::GameStateStore,
    error::ServerError,
    infrastructure::{InMemoryGameStateStore, RedisGameStateStore},
    usecase::SessionCoordinator,
};

/// Build the store and coordinator, bind, and serve until a shutdown signal.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let store: Arc<dyn GameStateStore> = match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory game state store; rooms are lost on restart");
            Arc::new(InMemoryGameStateStore::new())
        }
        StoreBackend::Redis => Arc::new(RedisGameStateStore::connect(&config.redis_url).await?),
    };

    let state = Arc::new(AppState::new(SessionCoordinator::new(
        store,
        config.room_ttl(),
    )));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
