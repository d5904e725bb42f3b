use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::{AuthService, GameCoordinator};

/// Application state shared by HTTP handlers and WebSocket sessions
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<GameCoordinator>,
    pub auth: Arc<AuthService>,
    /// Database connection (None when running on the in-process store)
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(
        coordinator: Arc<GameCoordinator>,
        auth: Arc<AuthService>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            coordinator,
            auth,
            db,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
