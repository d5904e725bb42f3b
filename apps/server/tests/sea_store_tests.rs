// SeaStore over an in-memory SQLite database, migrated from scratch.
//
//   cargo test --test sea_store_tests

mod common;
mod support;

use std::sync::Arc;

use chess_server::config::db::DbProfile;
use chess_server::domain::{Guid, Lifecycle, NewPlayer, PlayerId};
use chess_server::errors::{ConflictKind, DomainError};
use chess_server::infra::db::bootstrap_db;
use chess_server::rules::{ChessRules, RulesEngine};
use chess_server::services::{AuthService, GameCoordinator};
use chess_server::store::{GameStore, SeaStore};

use crate::support::players::seed_players;

async fn sea_store() -> SeaStore {
    let conn = bootstrap_db(&DbProfile::InMemory)
        .await
        .expect("migrate in-memory sqlite");
    SeaStore::new(conn)
}

#[tokio::test]
async fn players_round_trip() {
    let store = sea_store().await;
    let player = store
        .create_player(NewPlayer {
            name: "magnus".into(),
            password_hash: "salt$digest".into(),
            token: "tok-1".into(),
        })
        .await
        .unwrap();

    assert_eq!(store.find_player(player.id).await.unwrap(), Some(player.clone()));
    assert_eq!(
        store.find_player_by_token("tok-1").await.unwrap(),
        Some(player.clone())
    );
    let creds = store.find_credentials("magnus").await.unwrap().unwrap();
    assert_eq!(creds.player, player);
    assert_eq!(creds.password_hash, "salt$digest");

    assert!(store.find_player(PlayerId(9999)).await.unwrap().is_none());
    assert!(store.find_credentials("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_name_is_username_taken() {
    let store = sea_store().await;
    let new = |token: &str| NewPlayer {
        name: "hikaru".into(),
        password_hash: "salt$digest".into(),
        token: token.into(),
    };
    store.create_player(new("a")).await.unwrap();
    let err = store.create_player(new("b")).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::UsernameTaken, _)));
}

#[tokio::test]
async fn games_are_stored_and_queried() {
    let store = sea_store().await;
    let rules = ChessRules::new();
    let ids = seed_players(&store, 3).await;

    let g1 = store
        .create_game(ids[0], ids[1], rules.initial_board())
        .await
        .unwrap();
    let g2 = store
        .create_game(ids[1], ids[2], rules.initial_board())
        .await
        .unwrap();
    assert_ne!(g1.guid, g2.guid);
    assert_eq!(g1.lifecycle, Lifecycle::InProgress);

    let found = store.find_by_guid(g1.guid).await.unwrap().unwrap();
    assert_eq!(found.first_player, ids[0]);
    assert_eq!(found.second_player, ids[1]);
    assert_eq!(found.board, g1.board);

    let board = rules.apply_move(&g1.board, "e2e4").unwrap();
    let saved = store
        .save_board(g1.guid, board.clone(), Lifecycle::Draw)
        .await
        .unwrap();
    assert_eq!(saved.board, board);
    assert_eq!(saved.lifecycle, Lifecycle::Draw);

    let in_progress: Vec<Guid> = store
        .find_in_progress()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.guid)
        .collect();
    assert_eq!(in_progress, vec![g2.guid]);

    let for_middle: Vec<Guid> = store
        .find_by_player(ids[1])
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.guid)
        .collect();
    assert_eq!(for_middle, vec![g1.guid, g2.guid]);
}

#[tokio::test]
async fn save_board_for_unknown_guid_is_not_found() {
    let store = sea_store().await;
    let rules = ChessRules::new();
    let guid = Guid::new();
    let err = store
        .save_board(guid, rules.initial_board(), Lifecycle::InProgress)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::GameNotFound(guid));
    assert!(store.find_by_guid(guid).await.unwrap().is_none());
}

#[tokio::test]
async fn full_game_flow_on_sqlite() {
    let store: Arc<dyn GameStore> = Arc::new(sea_store().await);
    let coordinator = GameCoordinator::new(store.clone(), Arc::new(ChessRules::new()));
    let auth = AuthService::new(store.clone());

    let a = auth.register("anna", "pw", "pw").await.unwrap();
    let b = auth.register("boris", "pw", "pw").await.unwrap();
    assert_eq!(auth.login("anna", "pw").await.unwrap(), a);

    coordinator.enqueue(a.id).await;
    coordinator.enqueue(b.id).await;
    let created = coordinator.pair_queue().await.unwrap();
    assert_eq!(created.len(), 1);
    let guid = created[0];

    let snap = coordinator.query_state(guid).await.unwrap();
    let (x, y) = (snap.first_player.id, snap.second_player.id);
    coordinator.apply_move(guid, x, "e2e4").await.unwrap();
    coordinator.apply_move(guid, y, "c7c5").await.unwrap();

    let snap = coordinator.query_state(guid).await.unwrap();
    assert_eq!(snap.player_to_move(), x);
    assert_eq!(
        snap.board,
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
    );

    // a restarted server picks the game back up
    let restarted = GameCoordinator::new(store, Arc::new(ChessRules::new()));
    assert_eq!(restarted.load_active_from_store().await.unwrap(), 1);
    assert_eq!(restarted.active_games(), vec![guid]);
}

#[tokio::test]
async fn sqlite_file_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("chess.db").to_string_lossy().into_owned();
    let profile = DbProfile::SqliteFile { file };
    let rules = ChessRules::new();

    let guid = {
        let store = SeaStore::new(bootstrap_db(&profile).await.unwrap());
        let ids = seed_players(&store, 2).await;
        store
            .create_game(ids[0], ids[1], rules.initial_board())
            .await
            .unwrap()
            .guid
    };

    // migrations are idempotent on an existing schema
    let store = SeaStore::new(bootstrap_db(&profile).await.unwrap());
    let game = store.find_by_guid(guid).await.unwrap().unwrap();
    assert_eq!(game.lifecycle, Lifecycle::InProgress);
    assert_eq!(rules.encode(&game.board).unwrap(), rules.encode(&rules.initial_board()).unwrap());
}
