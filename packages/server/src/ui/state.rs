//! Shared application state.

use std::sync::Arc;

use crate::usecase::SessionCoordinator;

/// Shared application state
pub struct AppState {
    /// Session coordinator (owns the connection registry and the store handle)
    pub coordinator: Arc<SessionCoordinator>,
}

impl AppState {
    pub fn new(coordinator: SessionCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}
