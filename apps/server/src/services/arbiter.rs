//! Turn arbitration: who may move, and whether the move stands.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{Game, Guid, PlayerId};
use crate::errors::DomainError;
use crate::rules::RulesEngine;
use crate::store::GameStore;

/// Why a move attempt failed, and whether the game can still change.
enum Rejected {
    Live(DomainError),
    Settled(DomainError),
}

impl From<DomainError> for Rejected {
    fn from(err: DomainError) -> Self {
        Rejected::Live(err)
    }
}

/// Applies moves one game at a time. Moves on different games never wait on
/// each other.
pub struct TurnArbiter {
    store: Arc<dyn GameStore>,
    rules: Arc<dyn RulesEngine>,
    locks: DashMap<Guid, Arc<Mutex<()>>>,
}

impl TurnArbiter {
    pub fn new(store: Arc<dyn GameStore>, rules: Arc<dyn RulesEngine>) -> Self {
        Self {
            store,
            rules,
            locks: DashMap::new(),
        }
    }

    /// Validate and apply `mv` for `player`, returning the persisted game.
    ///
    /// Nothing is written unless the player is to move and the move is legal.
    pub async fn apply_move(
        &self,
        guid: Guid,
        player: PlayerId,
        mv: &str,
    ) -> Result<Game, DomainError> {
        let lock = self.locks.entry(guid).or_default().clone();
        let (result, settled) = {
            let _guard = lock.lock().await;
            self.apply_locked(guid, player, mv).await
        };

        // Missing and finished games take no more moves; keep no lock for them.
        if settled {
            // only our clone and the map's own copy left
            self.locks
                .remove_if(&guid, |_, l| Arc::strong_count(l) <= 2);
        }
        result
    }

    /// The flag is set when the game is missing or over once this attempt
    /// returns.
    async fn apply_locked(
        &self,
        guid: Guid,
        player: PlayerId,
        mv: &str,
    ) -> (Result<Game, DomainError>, bool) {
        match self.try_apply(guid, player, mv).await {
            Ok(game) => {
                let over = game.lifecycle.is_terminal();
                (Ok(game), over)
            }
            Err(Rejected::Settled(err)) => (Err(err), true),
            Err(Rejected::Live(err)) => (Err(err), false),
        }
    }

    async fn try_apply(&self, guid: Guid, player: PlayerId, mv: &str) -> Result<Game, Rejected> {
        let game = self
            .store
            .find_by_guid(guid)
            .await?
            .ok_or(Rejected::Settled(DomainError::GameNotFound(guid)))?;

        let to_move = game.player_on(self.rules.side_to_move(&game.board)?);
        if to_move != player {
            debug!(%guid, player_id = %player, "move rejected: not the player's turn");
            let err = DomainError::NotPlayersTurn { player, guid };
            return Err(if game.lifecycle.is_terminal() {
                Rejected::Settled(err)
            } else {
                Rejected::Live(err)
            });
        }

        if game.lifecycle.is_terminal() {
            debug!(%guid, player_id = %player, mv, "move rejected: game over");
            return Err(Rejected::Settled(DomainError::illegal_move(
                "game is already over",
            )));
        }
        if !self.rules.is_legal(&game.board, mv)? {
            debug!(%guid, player_id = %player, mv, "move rejected: illegal");
            return Err(Rejected::Live(DomainError::illegal_move(
                mv.trim().to_string(),
            )));
        }

        let board = self.rules.apply_move(&game.board, mv)?;
        let lifecycle = self.rules.lifecycle(&board)?;
        let saved = self.store.save_board(guid, board, lifecycle).await?;
        info!(%guid, player_id = %player, mv, lifecycle = %lifecycle, "move applied");
        Ok(saved)
    }

    /// Drop the lock entry of a game that left the registry.
    pub fn forget(&self, guid: Guid) {
        self.locks.remove(&guid);
    }

    pub fn tracked_locks(&self) -> usize {
        self.locks.len()
    }
}
