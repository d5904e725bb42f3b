use std::sync::Arc;

use crate::config::db::DbProfile;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::rules::{ChessRules, RulesEngine};
use crate::services::{AuthService, GameCoordinator};
use crate::state::app_state::AppState;
use crate::store::{GameStore, MemoryStore, SeaStore};

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_profile: Option<DbProfile>,
    store: Option<Arc<dyn GameStore>>,
    rules: Option<Arc<dyn RulesEngine>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_profile: None,
            store: None,
            rules: None,
        }
    }

    /// Back the store with a database; migrations run during `build`.
    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    /// Use an existing store. Takes precedence over `with_db`.
    pub fn with_store(mut self, store: Arc<dyn GameStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_rules(mut self, rules: Arc<dyn RulesEngine>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let (store, db): (Arc<dyn GameStore>, _) = match (self.store, self.db_profile) {
            (Some(store), _) => (store, None),
            (None, Some(profile)) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(&profile).await?;
                (Arc::new(SeaStore::new(conn.clone())), Some(conn))
            }
            (None, None) => (Arc::new(MemoryStore::new()), None),
        };
        let rules = self
            .rules
            .unwrap_or_else(|| Arc::new(ChessRules::new()));

        let coordinator = Arc::new(GameCoordinator::new(store.clone(), rules));
        let auth = Arc::new(AuthService::new(store));
        Ok(AppState::new(coordinator, auth, db))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
