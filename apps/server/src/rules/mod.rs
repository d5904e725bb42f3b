//! Rules engine seam. The core never looks inside a board blob; everything
//! it needs to know about a position goes through [`RulesEngine`].

pub mod chess;

use serde::{Deserialize, Serialize};

use crate::domain::{BoardState, Lifecycle, Outcome, Side};
use crate::errors::DomainError;

pub use chess::ChessRules;

/// Independent terminal conditions. More than one may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalFlags {
    pub checkmate: bool,
    pub stalemate: bool,
    pub insufficient_material: bool,
    /// Seventy-five move rule for chess.
    pub move_limit: bool,
    /// Fivefold repetition for chess.
    pub repetition: bool,
}

impl TerminalFlags {
    pub const fn is_terminal(&self) -> bool {
        self.checkmate
            || self.stalemate
            || self.insufficient_material
            || self.move_limit
            || self.repetition
    }

    /// Primary status, checkmate taking precedence over the draw conditions.
    pub const fn status(&self) -> TerminalStatus {
        if self.checkmate {
            TerminalStatus::Checkmate
        } else if self.stalemate {
            TerminalStatus::Stalemate
        } else if self.insufficient_material {
            TerminalStatus::InsufficientMaterial
        } else if self.move_limit {
            TerminalStatus::MoveLimit
        } else if self.repetition {
            TerminalStatus::Repetition
        } else {
            TerminalStatus::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    None,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    MoveLimit,
    Repetition,
}

/// Draws a player may claim but which do not end the game on their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawClaims {
    pub fifty_moves: bool,
    pub threefold_repetition: bool,
}

impl DrawClaims {
    pub const fn any(&self) -> bool {
        self.fifty_moves || self.threefold_repetition
    }
}

/// Game rules behind the turn arbiter.
///
/// Every method takes the opaque board blob as persisted by the store. A blob
/// the engine cannot decode is reported as `InfraErrorKind::DataCorruption`.
pub trait RulesEngine: Send + Sync {
    fn initial_board(&self) -> BoardState;

    /// `Ok(false)` for unparsable moves and for any move on a finished game.
    fn is_legal(&self, board: &BoardState, mv: &str) -> Result<bool, DomainError>;

    fn apply_move(&self, board: &BoardState, mv: &str) -> Result<BoardState, DomainError>;

    fn side_to_move(&self, board: &BoardState) -> Result<Side, DomainError>;

    fn terminal_status(&self, board: &BoardState) -> Result<TerminalFlags, DomainError>;

    fn claimable_draw(&self, board: &BoardState) -> Result<DrawClaims, DomainError>;

    /// `None` while the game is still running.
    fn result(&self, board: &BoardState) -> Result<Option<Outcome>, DomainError>;

    /// Human/wire encoding of the current position (FEN for chess).
    fn encode(&self, board: &BoardState) -> Result<String, DomainError>;

    fn lifecycle(&self, board: &BoardState) -> Result<Lifecycle, DomainError> {
        Ok(self
            .result(board)?
            .map_or(Lifecycle::InProgress, Lifecycle::from))
    }
}
