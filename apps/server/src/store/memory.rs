use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;

use super::GameStore;
use crate::domain::{
    BoardState, Game, Guid, Lifecycle, NewPlayer, Player, PlayerCredentials, PlayerId,
};
use crate::errors::{ConflictKind, DomainError};

#[derive(Default)]
struct Tables {
    games: Vec<Game>,
    by_guid: HashMap<Guid, usize>,
    players: Vec<PlayerCredentials>,
}

/// In-process store. Ids are assigned sequentially from 1.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_count(&self) -> usize {
        self.tables.lock().games.len()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn create_game(
        &self,
        first: PlayerId,
        second: PlayerId,
        board: BoardState,
    ) -> Result<Game, DomainError> {
        let mut tables = self.tables.lock();
        let now = OffsetDateTime::now_utc();
        let game = Game {
            id: tables.games.len() as i64 + 1,
            guid: Guid::new(),
            first_player: first,
            second_player: second,
            board,
            lifecycle: Lifecycle::InProgress,
            created_at: now,
            updated_at: now,
        };
        let idx = tables.games.len();
        tables.by_guid.insert(game.guid, idx);
        tables.games.push(game.clone());
        Ok(game)
    }

    async fn save_board(
        &self,
        guid: Guid,
        board: BoardState,
        lifecycle: Lifecycle,
    ) -> Result<Game, DomainError> {
        let mut tables = self.tables.lock();
        let idx = *tables
            .by_guid
            .get(&guid)
            .ok_or(DomainError::GameNotFound(guid))?;
        let game = &mut tables.games[idx];
        game.board = board;
        game.lifecycle = lifecycle;
        game.updated_at = OffsetDateTime::now_utc();
        Ok(game.clone())
    }

    async fn find_by_guid(&self, guid: Guid) -> Result<Option<Game>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables.by_guid.get(&guid).map(|&i| tables.games[i].clone()))
    }

    async fn find_in_progress(&self) -> Result<Vec<Game>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .games
            .iter()
            .filter(|g| g.lifecycle == Lifecycle::InProgress)
            .cloned()
            .collect())
    }

    async fn find_by_player(&self, player: PlayerId) -> Result<Vec<Game>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .games
            .iter()
            .filter(|g| g.involves(player))
            .cloned()
            .collect())
    }

    async fn create_player(&self, new: NewPlayer) -> Result<Player, DomainError> {
        let mut tables = self.tables.lock();
        if tables.players.iter().any(|c| c.player.name == new.name) {
            return Err(DomainError::conflict(
                ConflictKind::UsernameTaken,
                "Player name already taken",
            ));
        }
        let player = Player {
            id: PlayerId(tables.players.len() as i64 + 1),
            name: new.name,
            token: new.token,
        };
        tables.players.push(PlayerCredentials {
            player: player.clone(),
            password_hash: new.password_hash,
        });
        Ok(player)
    }

    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .players
            .iter()
            .find(|c| c.player.id == id)
            .map(|c| c.player.clone()))
    }

    async fn find_credentials(&self, name: &str) -> Result<Option<PlayerCredentials>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables.players.iter().find(|c| c.player.name == name).cloned())
    }

    async fn find_player_by_token(&self, token: &str) -> Result<Option<Player>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .players
            .iter()
            .find(|c| c.player.token == token)
            .map(|c| c.player.clone()))
    }
}
