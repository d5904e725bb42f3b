// Turn arbitration and registry bookkeeping.
//
//   cargo test --test arbiter_tests

mod common;
mod support;

use std::sync::Arc;

use chess_server::domain::{Guid, Lifecycle, Outcome, PlayerId, Side};
use chess_server::errors::DomainError;
use chess_server::rules::{ChessRules, RulesEngine, TerminalStatus};
use chess_server::services::{GameCoordinator, TurnArbiter};
use chess_server::store::{GameStore, MemoryStore};

use crate::support::players::{memory_coordinator, seed_players};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A fresh game and its players ordered (first-moving, second-moving).
async fn started_game(coordinator: &GameCoordinator, store: &MemoryStore) -> (Guid, PlayerId, PlayerId) {
    let ids = seed_players(store, 2).await;
    let guid = coordinator.direct_pair(ids[0], ids[1]).await.unwrap();
    let snap = coordinator.query_state(guid).await.unwrap();
    (guid, snap.first_player.id, snap.second_player.id)
}

#[tokio::test]
async fn only_the_player_to_move_may_move() {
    let (coordinator, store) = memory_coordinator();
    let (guid, x, y) = started_game(&coordinator, &store).await;

    let err = coordinator.apply_move(guid, y, "e7e5").await.unwrap_err();
    assert_eq!(err, DomainError::NotPlayersTurn { player: y, guid });
    assert_eq!(coordinator.query_state(guid).await.unwrap().board, START_FEN);

    let err = coordinator.apply_move(guid, x, "e2e5").await.unwrap_err();
    assert!(matches!(err, DomainError::IllegalMove(_)));
    let err = coordinator.apply_move(guid, x, "not-a-move").await.unwrap_err();
    assert!(matches!(err, DomainError::IllegalMove(_)));
    assert_eq!(coordinator.query_state(guid).await.unwrap().board, START_FEN);

    coordinator.apply_move(guid, x, "e2e4").await.unwrap();
    let snap = coordinator.query_state(guid).await.unwrap();
    assert_ne!(snap.board, START_FEN);
    assert_eq!(snap.side_to_move, Side::Second);
    assert_eq!(snap.player_to_move(), y);
    assert!(snap.last_move >= snap.started);
}

#[tokio::test]
async fn move_on_unknown_game_is_not_found() {
    let (coordinator, store) = memory_coordinator();
    let ids = seed_players(&*store, 1).await;
    let guid = Guid::new();
    assert_eq!(
        coordinator.apply_move(guid, ids[0], "e2e4").await.unwrap_err(),
        DomainError::GameNotFound(guid)
    );
}

#[tokio::test]
async fn checkmate_finishes_the_game_and_leaves_the_registry() {
    let (coordinator, store) = memory_coordinator();
    let (guid, x, y) = started_game(&coordinator, &store).await;
    assert_eq!(coordinator.active_count().await.unwrap(), 1);

    for (player, mv) in [(x, "f2f3"), (y, "e7e5"), (x, "g2g4"), (y, "d8h4")] {
        coordinator.apply_move(guid, player, mv).await.unwrap();
    }

    let snap = coordinator.query_state(guid).await.unwrap();
    assert!(snap.game_over);
    assert!(snap.terminal.checkmate);
    assert_eq!(snap.status, TerminalStatus::Checkmate);
    assert_eq!(snap.result, Some(Outcome::SecondWon));
    assert_eq!(snap.lifecycle, Lifecycle::SecondWon);
    assert_eq!(snap.winner, Some(y));

    let stored = store.find_by_guid(guid).await.unwrap().unwrap();
    assert_eq!(stored.lifecycle, Lifecycle::SecondWon);

    // the mated side is to move, but the game is over
    let err = coordinator.apply_move(guid, x, "e2e4").await.unwrap_err();
    assert!(matches!(err, DomainError::IllegalMove(_)));

    assert_eq!(coordinator.active_count().await.unwrap(), 0);
    assert!(coordinator.active_games().is_empty());
    assert!(coordinator.current_games(x).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_moves_on_one_game_apply_once() {
    let (coordinator, store) = memory_coordinator();
    let (guid, x, _) = started_game(&coordinator, &store).await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.apply_move(guid, x, "e2e4").await })
        })
        .collect();

    let mut ok = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => ok += 1,
            Err(DomainError::NotPlayersTurn { .. }) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(ok, 1);
}

#[tokio::test]
async fn games_proceed_independently() {
    let (coordinator, store) = memory_coordinator();
    let (g1, x1, _) = started_game(&coordinator, &store).await;
    let (g2, x2, _) = started_game(&coordinator, &store).await;

    let (a, b) = tokio::join!(
        coordinator.apply_move(g1, x1, "d2d4"),
        coordinator.apply_move(g2, x2, "c2c4"),
    );
    a.unwrap();
    b.unwrap();
    assert_eq!(coordinator.active_count().await.unwrap(), 2);
}

#[tokio::test]
async fn arbiter_drops_lock_for_missing_games() {
    let store = Arc::new(MemoryStore::new());
    let arbiter = TurnArbiter::new(store.clone(), Arc::new(ChessRules::new()));
    let ids = seed_players(&*store, 1).await;

    let _ = arbiter.apply_move(Guid::new(), ids[0], "e2e4").await;
    assert_eq!(arbiter.tracked_locks(), 0);
}

#[tokio::test]
async fn active_games_are_reloaded_from_the_store() {
    let store = Arc::new(MemoryStore::new());
    let rules = Arc::new(ChessRules::new());
    let ids = seed_players(&*store, 4).await;

    let live = store
        .create_game(ids[0], ids[1], rules.initial_board())
        .await
        .unwrap();
    let done = store
        .create_game(ids[2], ids[3], rules.initial_board())
        .await
        .unwrap();
    store
        .save_board(done.guid, done.board.clone(), Lifecycle::Draw)
        .await
        .unwrap();

    let coordinator = GameCoordinator::new(store.clone(), rules);
    assert_eq!(coordinator.load_active_from_store().await.unwrap(), 1);
    assert_eq!(coordinator.active_games(), vec![live.guid]);
    // loading twice does not double count
    assert_eq!(coordinator.load_active_from_store().await.unwrap(), 0);
    assert_eq!(coordinator.active_count().await.unwrap(), 1);
}

#[tokio::test]
async fn sweep_only_touches_the_registry() {
    let (coordinator, store) = memory_coordinator();
    let (guid, _, _) = started_game(&coordinator, &store).await;
    let game = store.find_by_guid(guid).await.unwrap().unwrap();
    store
        .save_board(guid, game.board, Lifecycle::Draw)
        .await
        .unwrap();

    assert_eq!(coordinator.sweep_registry().await.unwrap(), 1);
    assert_eq!(coordinator.sweep_registry().await.unwrap(), 0);
    // the record itself survives
    assert_eq!(
        store.find_by_guid(guid).await.unwrap().unwrap().lifecycle,
        Lifecycle::Draw
    );
}
