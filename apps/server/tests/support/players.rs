// Player fixtures

use std::sync::Arc;

use chess_server::domain::{NewPlayer, PlayerId};
use chess_server::rules::ChessRules;
use chess_server::services::GameCoordinator;
use chess_server::store::{GameStore, MemoryStore};
use server_test_support::unique_helpers::unique_name;

/// Insert a player with a unique name and return its id.
pub async fn seed_player(store: &dyn GameStore, prefix: &str) -> PlayerId {
    let name = unique_name(prefix);
    store
        .create_player(NewPlayer {
            token: format!("token-{name}"),
            password_hash: "salt$digest".into(),
            name,
        })
        .await
        .expect("seed player")
        .id
}

pub async fn seed_players(store: &dyn GameStore, n: usize) -> Vec<PlayerId> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        ids.push(seed_player(store, &format!("p{i}")).await);
    }
    ids
}

/// Coordinator over a fresh in-memory store, plus the store itself so tests
/// can inspect what was persisted.
pub fn memory_coordinator() -> (Arc<GameCoordinator>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Arc::new(GameCoordinator::new(
        store.clone(),
        Arc::new(ChessRules::new()),
    ));
    (coordinator, store)
}
