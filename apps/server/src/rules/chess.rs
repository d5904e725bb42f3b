//! Chess rules over `shakmaty`.
//!
//! The board blob is a small JSON record holding the starting FEN and the UCI
//! move list. Positions are rebuilt by replay, which is what lets repetition
//! be detected without any extra state in the store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position};

use super::{DrawClaims, RulesEngine, TerminalFlags};
use crate::domain::{BoardState, Outcome, Side};
use crate::errors::DomainError;

const FIFTY_MOVE_HALFMOVES: u32 = 100;
const SEVENTY_FIVE_MOVE_HALFMOVES: u32 = 150;
const THREEFOLD: usize = 3;
const FIVEFOLD: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardRecord {
    start: String,
    #[serde(default)]
    moves: Vec<String>,
}

/// Position reached by replaying a record, with how often it has occurred.
struct Replayed {
    position: Chess,
    occurrences: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChessRules;

impl ChessRules {
    pub fn new() -> Self {
        Self
    }

    /// Board blob starting from an arbitrary position.
    pub fn board_from_fen(&self, fen: &str) -> Result<BoardState, DomainError> {
        parse_fen(fen).map_err(DomainError::validation)?;
        encode_record(&BoardRecord {
            start: fen.trim().to_string(),
            moves: Vec::new(),
        })
    }

    fn decode(&self, board: &BoardState) -> Result<BoardRecord, DomainError> {
        serde_json::from_str(board.as_str())
            .map_err(|e| DomainError::corrupt(format!("undecodable board: {e}")))
    }

    fn replay(&self, record: &BoardRecord) -> Result<Replayed, DomainError> {
        let mut position = parse_fen(&record.start).map_err(DomainError::corrupt)?;
        let mut seen: HashMap<String, usize> = HashMap::new();
        *seen.entry(repetition_key(&position)).or_default() += 1;

        for mv in &record.moves {
            let parsed = to_legal_move(&position, mv)
                .ok_or_else(|| DomainError::corrupt(format!("stored move {mv} does not replay")))?;
            position = position
                .play(&parsed)
                .map_err(|_| DomainError::corrupt(format!("stored move {mv} does not replay")))?;
            *seen.entry(repetition_key(&position)).or_default() += 1;
        }

        let occurrences = seen
            .get(&repetition_key(&position))
            .copied()
            .unwrap_or(1);
        Ok(Replayed {
            position,
            occurrences,
        })
    }

    fn load(&self, board: &BoardState) -> Result<Replayed, DomainError> {
        let record = self.decode(board)?;
        self.replay(&record)
    }
}

fn parse_fen(fen: &str) -> Result<Chess, String> {
    let fen: Fen = fen.trim().parse().map_err(|e| format!("invalid FEN: {e}"))?;
    fen.into_position(CastlingMode::Standard)
        .map_err(|e| format!("invalid position: {e}"))
}

fn to_fen(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// Placement, side to move, castling rights and en passant square.
fn repetition_key(position: &Chess) -> String {
    to_fen(position)
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_legal_move(position: &Chess, mv: &str) -> Option<shakmaty::Move> {
    let uci: UciMove = mv.trim().parse().ok()?;
    let m = uci.to_move(position).ok()?;
    position.is_legal(&m).then_some(m)
}

fn encode_record(record: &BoardRecord) -> Result<BoardState, DomainError> {
    serde_json::to_string(record)
        .map(BoardState::new)
        .map_err(|e| DomainError::corrupt(format!("unencodable board: {e}")))
}

const fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::First,
        Color::Black => Side::Second,
    }
}

fn flags(replayed: &Replayed) -> TerminalFlags {
    let pos = &replayed.position;
    TerminalFlags {
        checkmate: pos.is_checkmate(),
        stalemate: pos.is_stalemate(),
        insufficient_material: pos.is_insufficient_material(),
        move_limit: pos.halfmoves() >= SEVENTY_FIVE_MOVE_HALFMOVES,
        repetition: replayed.occurrences >= FIVEFOLD,
    }
}

impl RulesEngine for ChessRules {
    fn initial_board(&self) -> BoardState {
        let record = BoardRecord {
            start: to_fen(&Chess::default()),
            moves: Vec::new(),
        };
        // A fixed record always serializes.
        BoardState::new(serde_json::to_string(&record).unwrap_or_default())
    }

    fn is_legal(&self, board: &BoardState, mv: &str) -> Result<bool, DomainError> {
        let replayed = self.load(board)?;
        if flags(&replayed).is_terminal() {
            return Ok(false);
        }
        Ok(to_legal_move(&replayed.position, mv).is_some())
    }

    fn apply_move(&self, board: &BoardState, mv: &str) -> Result<BoardState, DomainError> {
        let mut record = self.decode(board)?;
        let replayed = self.replay(&record)?;
        if flags(&replayed).is_terminal() {
            return Err(DomainError::illegal_move("game is already over"));
        }
        let m = to_legal_move(&replayed.position, mv)
            .ok_or_else(|| DomainError::illegal_move(mv.trim().to_string()))?;
        record
            .moves
            .push(UciMove::from_move(&m, CastlingMode::Standard).to_string());
        encode_record(&record)
    }

    fn side_to_move(&self, board: &BoardState) -> Result<Side, DomainError> {
        Ok(side_of(self.load(board)?.position.turn()))
    }

    fn terminal_status(&self, board: &BoardState) -> Result<TerminalFlags, DomainError> {
        Ok(flags(&self.load(board)?))
    }

    fn claimable_draw(&self, board: &BoardState) -> Result<DrawClaims, DomainError> {
        let replayed = self.load(board)?;
        Ok(DrawClaims {
            fifty_moves: replayed.position.halfmoves() >= FIFTY_MOVE_HALFMOVES,
            threefold_repetition: replayed.occurrences >= THREEFOLD,
        })
    }

    fn result(&self, board: &BoardState) -> Result<Option<Outcome>, DomainError> {
        let replayed = self.load(board)?;
        let flags = flags(&replayed);
        if !flags.is_terminal() {
            return Ok(None);
        }
        if flags.checkmate {
            // the side to move is the one that got mated
            return Ok(Some(match side_of(replayed.position.turn()) {
                Side::First => Outcome::SecondWon,
                Side::Second => Outcome::FirstWon,
            }));
        }
        Ok(Some(Outcome::Draw))
    }

    fn encode(&self, board: &BoardState) -> Result<String, DomainError> {
        Ok(to_fen(&self.load(board)?.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Lifecycle;
    use crate::rules::TerminalStatus;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn play(rules: &ChessRules, mut board: BoardState, moves: &[&str]) -> BoardState {
        for mv in moves {
            board = rules.apply_move(&board, mv).unwrap();
        }
        board
    }

    #[test]
    fn initial_board_is_standard_start() {
        let rules = ChessRules::new();
        let board = rules.initial_board();
        assert_eq!(rules.encode(&board).unwrap(), START_FEN);
        assert_eq!(rules.side_to_move(&board).unwrap(), Side::First);
        assert_eq!(rules.lifecycle(&board).unwrap(), Lifecycle::InProgress);
    }

    #[test]
    fn legality_checks() {
        let rules = ChessRules::new();
        let board = rules.initial_board();
        assert!(rules.is_legal(&board, "e2e4").unwrap());
        assert!(!rules.is_legal(&board, "e2e5").unwrap());
        assert!(!rules.is_legal(&board, "e7e5").unwrap());
        assert!(!rules.is_legal(&board, "garbage").unwrap());
        assert!(matches!(
            rules.apply_move(&board, "e2e5"),
            Err(DomainError::IllegalMove(_))
        ));
    }

    #[test]
    fn side_to_move_alternates() {
        let rules = ChessRules::new();
        let board = play(&rules, rules.initial_board(), &["e2e4"]);
        assert_eq!(rules.side_to_move(&board).unwrap(), Side::Second);
        let board = play(&rules, board, &["e7e5"]);
        assert_eq!(rules.side_to_move(&board).unwrap(), Side::First);
    }

    #[test]
    fn fools_mate_is_won_by_second() {
        let rules = ChessRules::new();
        let board = play(
            &rules,
            rules.initial_board(),
            &["f2f3", "e7e5", "g2g4", "d8h4"],
        );
        let flags = rules.terminal_status(&board).unwrap();
        assert!(flags.checkmate);
        assert_eq!(flags.status(), TerminalStatus::Checkmate);
        assert_eq!(rules.result(&board).unwrap(), Some(Outcome::SecondWon));
        assert_eq!(rules.lifecycle(&board).unwrap(), Lifecycle::SecondWon);
        assert!(!rules.is_legal(&board, "a2a3").unwrap());
        assert!(rules.apply_move(&board, "a2a3").is_err());
    }

    #[test]
    fn stalemate_is_a_draw() {
        let rules = ChessRules::new();
        let board = rules.board_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let flags = rules.terminal_status(&board).unwrap();
        assert!(flags.stalemate);
        assert!(!flags.checkmate);
        assert_eq!(rules.result(&board).unwrap(), Some(Outcome::Draw));
    }

    #[test]
    fn bare_kings_are_insufficient_material() {
        let rules = ChessRules::new();
        let board = rules.board_from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(rules.terminal_status(&board).unwrap().insufficient_material);
        assert_eq!(rules.lifecycle(&board).unwrap(), Lifecycle::Draw);
    }

    #[test]
    fn halfmove_clock_drives_claims_and_move_limit() {
        let rules = ChessRules::new();
        let board = rules
            .board_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80")
            .unwrap();
        assert!(rules.claimable_draw(&board).unwrap().fifty_moves);
        assert!(rules.result(&board).unwrap().is_none());

        let board = rules
            .board_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 149 80")
            .unwrap();
        let board = play(&rules, board, &["a1a2"]);
        let flags = rules.terminal_status(&board).unwrap();
        assert!(flags.move_limit);
        assert_eq!(flags.status(), TerminalStatus::MoveLimit);
        assert_eq!(rules.result(&board).unwrap(), Some(Outcome::Draw));
    }

    #[test]
    fn knight_shuffle_repeats_the_start() {
        let rules = ChessRules::new();
        let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        let mut board = rules.initial_board();
        for _ in 0..2 {
            board = play(&rules, board, &cycle);
        }
        let claims = rules.claimable_draw(&board).unwrap();
        assert!(claims.threefold_repetition);
        assert!(claims.any());
        assert!(!rules.terminal_status(&board).unwrap().repetition);

        for _ in 0..2 {
            board = play(&rules, board, &cycle);
        }
        let flags = rules.terminal_status(&board).unwrap();
        assert!(flags.repetition);
        assert_eq!(rules.result(&board).unwrap(), Some(Outcome::Draw));
    }

    #[test]
    fn garbage_blob_is_corruption() {
        let rules = ChessRules::new();
        let err = rules.side_to_move(&BoardState::new("not json")).unwrap_err();
        assert!(err.is_infra());
    }

    #[test]
    fn bad_fen_is_rejected() {
        let rules = ChessRules::new();
        assert!(matches!(
            rules.board_from_fen("not a fen"),
            Err(DomainError::Validation(_))
        ));
    }
}
