//! Durable record of games and players.
//!
//! The core only talks to storage through [`GameStore`]. `SeaStore` backs it
//! with Postgres or SQLite; `MemoryStore` keeps everything in process and is
//! what most tests run against.

mod memory;
mod sea;

use async_trait::async_trait;

use crate::domain::{BoardState, Game, Guid, Lifecycle, NewPlayer, Player, PlayerCredentials, PlayerId};
use crate::errors::DomainError;

pub use memory::MemoryStore;
pub use sea::SeaStore;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Persist a new in-progress game. The returned record carries the guid.
    async fn create_game(
        &self,
        first: PlayerId,
        second: PlayerId,
        board: BoardState,
    ) -> Result<Game, DomainError>;

    /// Overwrite the board and lifecycle. `GameNotFound` for unknown guids.
    async fn save_board(
        &self,
        guid: Guid,
        board: BoardState,
        lifecycle: Lifecycle,
    ) -> Result<Game, DomainError>;

    async fn find_by_guid(&self, guid: Guid) -> Result<Option<Game>, DomainError>;

    async fn find_in_progress(&self) -> Result<Vec<Game>, DomainError>;

    /// Every game the player takes part in, in creation order.
    async fn find_by_player(&self, player: PlayerId) -> Result<Vec<Game>, DomainError>;

    /// `Conflict(UsernameTaken)` when the name exists.
    async fn create_player(&self, new: NewPlayer) -> Result<Player, DomainError>;

    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, DomainError>;

    async fn find_credentials(&self, name: &str) -> Result<Option<PlayerCredentials>, DomainError>;

    async fn find_player_by_token(&self, token: &str) -> Result<Option<Player>, DomainError>;
}
