//! Public snapshot API for observing game state without exposing internals.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::game::{Lifecycle, Outcome, Side};
use super::ids::{Guid, PlayerId};
use super::player::PlayerSummary;
use crate::rules::{DrawClaims, TerminalFlags, TerminalStatus};

/// Point-in-time view of a game, as returned by a state query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub guid: Guid,
    pub first_player: PlayerSummary,
    pub second_player: PlayerSummary,
    #[serde(with = "time::serde::rfc3339")]
    pub started: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_move: OffsetDateTime,
    /// Board encoding from the rules engine (FEN for chess).
    pub board: String,
    pub side_to_move: Side,
    pub lifecycle: Lifecycle,
    pub game_over: bool,
    pub status: TerminalStatus,
    pub terminal: TerminalFlags,
    pub draw_claims: DrawClaims,
    pub can_claim_draw: bool,
    pub result: Option<Outcome>,
    pub winner: Option<PlayerId>,
}

impl GameSnapshot {
    pub fn player_to_move(&self) -> PlayerId {
        match self.side_to_move {
            Side::First => self.first_player.id,
            Side::Second => self.second_player.id,
        }
    }
}

/// What one participant needs to know about their seat in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub guid: Guid,
    pub my_side: Side,
    pub my_turn: bool,
    pub opponent: PlayerSummary,
}
