//! Facade the session gateway and the scheduler call into.
//!
//! Owns the matchmaking queue, the registry of active games and the turn
//! arbiter, and talks to the store and rules engine through their traits.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::domain::{
    assign_sides, Game, GameSnapshot, Guid, Lifecycle, PlayerId, PlayerSummary, SeatView,
};
use crate::errors::DomainError;
use crate::rules::RulesEngine;
use crate::services::arbiter::TurnArbiter;
use crate::services::matchmaking::{DequeueOutcome, EnqueueOutcome, HandoffPoll, MatchmakingQueue};
use crate::services::registry::GameRegistry;
use crate::store::GameStore;

pub struct GameCoordinator {
    store: Arc<dyn GameStore>,
    rules: Arc<dyn RulesEngine>,
    queue: MatchmakingQueue,
    registry: GameRegistry,
    arbiter: TurnArbiter,
}

impl GameCoordinator {
    pub fn new(store: Arc<dyn GameStore>, rules: Arc<dyn RulesEngine>) -> Self {
        let arbiter = TurnArbiter::new(store.clone(), rules.clone());
        Self {
            store,
            rules,
            queue: MatchmakingQueue::new(),
            registry: GameRegistry::new(),
            arbiter,
        }
    }

    // ----- matchmaking -----

    pub async fn enqueue(&self, player: PlayerId) -> EnqueueOutcome {
        let outcome = self.queue.enqueue(player).await;
        debug!(player_id = %player, ?outcome, "enqueue");
        outcome
    }

    pub async fn dequeue(&self, player: PlayerId) -> DequeueOutcome {
        let outcome = self.queue.dequeue(player).await;
        debug!(player_id = %player, ?outcome, "dequeue");
        outcome
    }

    pub async fn poll_handoff(&self, player: PlayerId) -> HandoffPoll {
        self.queue.poll_handoff(player).await
    }

    pub async fn queued_count(&self) -> usize {
        self.queue.len().await
    }

    /// Start a game between two players without going through the queue.
    /// `a == b` starts a self-play game.
    pub async fn direct_pair(&self, a: PlayerId, b: PlayerId) -> Result<Guid, DomainError> {
        for id in [a, b] {
            if self.store.find_player(id).await?.is_none() {
                return Err(DomainError::PlayerNotFound(id.to_string()));
            }
        }

        // Held across creation so a pairing sweep cannot draw either player
        // while their game is being written.
        let mut queue = self.queue.lock().await;
        let was_queued = [a, b].map(|p| queue.remove(p));

        let mut rng = StdRng::from_os_rng();
        let game = match self.persist_game(&mut rng, a, b).await {
            Ok(game) => game,
            Err(err) => {
                for (player, queued) in [a, b].into_iter().zip(was_queued) {
                    if queued {
                        queue.restore(player);
                    }
                }
                return Err(err);
            }
        };
        drop(queue);

        info!(guid = %game.guid, first = %game.first_player, second = %game.second_player, "direct pairing");
        Ok(game.guid)
    }

    /// Drain the queue into games. Returns the guids created by this sweep.
    pub async fn pair_queue(&self) -> Result<Vec<Guid>, DomainError> {
        let mut rng = StdRng::from_os_rng();
        self.pair_queue_with(&mut rng).await
    }

    /// Pairing sweep with a caller-provided rng.
    ///
    /// Holds the queue lock for the whole sweep. If a game cannot be created
    /// the pair goes back into the queue and the sweep stops with the error.
    pub async fn pair_queue_with<R: Rng + Send>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<Guid>, DomainError> {
        let mut queue = self.queue.lock().await;
        let mut created = Vec::new();

        while let Some((a, b)) = queue.draw_pair(&mut *rng) {
            let game = match self.persist_game(&mut *rng, a, b).await {
                Ok(game) => game,
                Err(err) => {
                    queue.restore_pair(a, b);
                    warn!(error = %err, player_a = %a, player_b = %b, "pairing sweep aborted");
                    return Err(err);
                }
            };
            queue.record_handoff(a, game.guid);
            queue.record_handoff(b, game.guid);
            created.push(game.guid);
        }

        if !created.is_empty() {
            info!(games = created.len(), queue_len = queue.len(), "pairing sweep");
        }
        Ok(created)
    }

    async fn persist_game<R: Rng + Send>(
        &self,
        rng: &mut R,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<Game, DomainError> {
        let (first, second) = assign_sides(rng, a, b);
        let game = self
            .store
            .create_game(first, second, self.rules.initial_board())
            .await?;
        self.registry.insert(game.guid);
        Ok(game)
    }

    // ----- play -----

    pub async fn apply_move(
        &self,
        guid: Guid,
        player: PlayerId,
        mv: &str,
    ) -> Result<(), DomainError> {
        self.arbiter.apply_move(guid, player, mv).await?;
        Ok(())
    }

    pub async fn query_state(&self, guid: Guid) -> Result<GameSnapshot, DomainError> {
        let game = self.require_game(guid).await?;
        let first_player = self.player_summary(game.first_player).await?;
        let second_player = self.player_summary(game.second_player).await?;

        let board = &game.board;
        let terminal = self.rules.terminal_status(board)?;
        let draw_claims = self.rules.claimable_draw(board)?;
        let result = self.rules.result(board)?;
        let lifecycle = result.map_or(game.lifecycle, Lifecycle::from);

        Ok(GameSnapshot {
            guid,
            first_player,
            second_player,
            started: game.created_at,
            last_move: game.updated_at,
            board: self.rules.encode(board)?,
            side_to_move: self.rules.side_to_move(board)?,
            lifecycle,
            game_over: terminal.is_terminal() || lifecycle.is_terminal(),
            status: terminal.status(),
            terminal,
            can_claim_draw: draw_claims.any(),
            draw_claims,
            result,
            winner: result
                .and_then(|outcome| outcome.winner())
                .map(|side| game.player_on(side)),
        })
    }

    /// In-progress games the player is seated in.
    pub async fn current_games(&self, player: PlayerId) -> Result<Vec<Guid>, DomainError> {
        Ok(self
            .store
            .find_by_player(player)
            .await?
            .into_iter()
            .filter(|g| g.lifecycle == Lifecycle::InProgress)
            .map(|g| g.guid)
            .collect())
    }

    pub async fn seat_view(&self, guid: Guid, player: PlayerId) -> Result<SeatView, DomainError> {
        let game = self.require_game(guid).await?;
        let my_side = game
            .side_of(player)
            .ok_or(DomainError::NotParticipant(player, guid))?;
        let to_move = game.player_on(self.rules.side_to_move(&game.board)?);
        let opponent = game
            .opponent_of(player)
            .ok_or(DomainError::NotParticipant(player, guid))?;
        let opponent = self.player_summary(opponent).await?;
        Ok(SeatView {
            guid,
            my_side,
            my_turn: to_move == player && !game.lifecycle.is_terminal(),
            opponent,
        })
    }

    // ----- registry bookkeeping -----

    /// Sweeps the registry first, so finished games are never counted.
    pub async fn active_count(&self) -> Result<usize, DomainError> {
        self.sweep_registry().await?;
        Ok(self.registry.len())
    }

    /// Guids currently tracked, without sweeping.
    pub fn active_games(&self) -> Vec<Guid> {
        self.registry.snapshot()
    }

    pub async fn load_active_from_store(&self) -> Result<usize, DomainError> {
        let games = self.store.find_in_progress().await?;
        let loaded = games
            .iter()
            .filter(|g| self.registry.insert(g.guid))
            .count();
        info!(loaded, "active games loaded from store");
        Ok(loaded)
    }

    /// Drop every tracked game that is finished or no longer stored.
    /// Returns how many were removed.
    pub async fn sweep_registry(&self) -> Result<usize, DomainError> {
        let mut removed = 0;
        for guid in self.registry.snapshot() {
            let finished = match self.store.find_by_guid(guid).await? {
                None => {
                    warn!(%guid, "tracked game missing from store");
                    true
                }
                Some(game) => {
                    game.lifecycle.is_terminal()
                        || self.rules.lifecycle(&game.board)?.is_terminal()
                }
            };
            if finished && self.registry.remove(guid) {
                self.arbiter.forget(guid);
                debug!(%guid, "game left the registry");
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn require_game(&self, guid: Guid) -> Result<Game, DomainError> {
        self.store
            .find_by_guid(guid)
            .await?
            .ok_or(DomainError::GameNotFound(guid))
    }

    async fn player_summary(&self, id: PlayerId) -> Result<PlayerSummary, DomainError> {
        self.store
            .find_player(id)
            .await?
            .map(|p| PlayerSummary::from(&p))
            .ok_or_else(|| DomainError::PlayerNotFound(id.to_string()))
    }
}
