//! DTOs for games_sea adapter.

use crate::entities::games::GameState;

/// DTO for creating a new game.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub guid: String,
    pub first_player_id: i64,
    pub second_player_id: i64,
    pub board: String,
}

impl GameCreate {
    pub fn new(guid: impl Into<String>, first_player_id: i64, second_player_id: i64) -> Self {
        Self {
            guid: guid.into(),
            first_player_id,
            second_player_id,
            board: String::new(),
        }
    }

    pub fn with_board(mut self, board: impl Into<String>) -> Self {
        self.board = board.into();
        self
    }
}

/// DTO for persisting a board after a move.
#[derive(Debug, Clone)]
pub struct GameUpdateBoard {
    pub guid: String,
    pub board: String,
    pub state: GameState,
}

impl GameUpdateBoard {
    pub fn new(guid: impl Into<String>, board: impl Into<String>, state: GameState) -> Self {
        Self {
            guid: guid.into(),
            board: board.into(),
            state,
        }
    }
}
