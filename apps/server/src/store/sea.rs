use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::GameStore;
use crate::adapters::{games_sea, players_sea};
use crate::domain::{
    BoardState, Game, Guid, Lifecycle, NewPlayer, Player, PlayerCredentials, PlayerId,
};
use crate::entities::games::{self, GameState};
use crate::entities::players;
use crate::errors::DomainError;
use crate::infra::db_errors::map_db_err;

/// Store backed by a SeaORM connection (Postgres or SQLite).
#[derive(Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Lifecycle> for GameState {
    fn from(lifecycle: Lifecycle) -> Self {
        match lifecycle {
            Lifecycle::InProgress => GameState::InProgress,
            Lifecycle::FirstWon => GameState::FirstWon,
            Lifecycle::SecondWon => GameState::SecondWon,
            Lifecycle::Draw => GameState::Draw,
        }
    }
}

impl From<GameState> for Lifecycle {
    fn from(state: GameState) -> Self {
        match state {
            GameState::InProgress => Lifecycle::InProgress,
            GameState::FirstWon => Lifecycle::FirstWon,
            GameState::SecondWon => Lifecycle::SecondWon,
            GameState::Draw => Lifecycle::Draw,
        }
    }
}

impl TryFrom<games::Model> for Game {
    type Error = DomainError;

    fn try_from(model: games::Model) -> Result<Self, Self::Error> {
        let guid = model
            .guid
            .parse::<Guid>()
            .map_err(|e| DomainError::corrupt(format!("game {}: bad guid: {e}", model.id)))?;
        Ok(Self {
            id: model.id,
            guid,
            first_player: PlayerId(model.first_player_id),
            second_player: PlayerId(model.second_player_id),
            board: BoardState::new(model.board),
            lifecycle: model.state.into(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: PlayerId(model.id),
            name: model.name,
            token: model.token,
        }
    }
}

fn into_games(models: Vec<games::Model>) -> Result<Vec<Game>, DomainError> {
    models.into_iter().map(Game::try_from).collect()
}

#[async_trait]
impl GameStore for SeaStore {
    async fn create_game(
        &self,
        first: PlayerId,
        second: PlayerId,
        board: BoardState,
    ) -> Result<Game, DomainError> {
        let dto = games_sea::GameCreate::new(Guid::new().to_string(), first.get(), second.get())
            .with_board(board.into_inner());
        let model = games_sea::create_game(&self.db, dto)
            .await
            .map_err(map_db_err)?;
        Game::try_from(model)
    }

    async fn save_board(
        &self,
        guid: Guid,
        board: BoardState,
        lifecycle: Lifecycle,
    ) -> Result<Game, DomainError> {
        let dto = games_sea::GameUpdateBoard::new(guid.to_string(), board.into_inner(), lifecycle.into());
        match games_sea::update_board(&self.db, dto).await {
            Ok(model) => Game::try_from(model),
            Err(sea_orm::DbErr::RecordNotFound(_)) => Err(DomainError::GameNotFound(guid)),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn find_by_guid(&self, guid: Guid) -> Result<Option<Game>, DomainError> {
        games_sea::find_by_guid(&self.db, &guid.to_string())
            .await
            .map_err(map_db_err)?
            .map(Game::try_from)
            .transpose()
    }

    async fn find_in_progress(&self) -> Result<Vec<Game>, DomainError> {
        let models = games_sea::find_by_state(&self.db, GameState::InProgress)
            .await
            .map_err(map_db_err)?;
        into_games(models)
    }

    async fn find_by_player(&self, player: PlayerId) -> Result<Vec<Game>, DomainError> {
        let models = games_sea::find_by_player(&self.db, player.get())
            .await
            .map_err(map_db_err)?;
        into_games(models)
    }

    async fn create_player(&self, new: NewPlayer) -> Result<Player, DomainError> {
        let dto = players_sea::PlayerCreate {
            name: new.name,
            password_hash: new.password_hash,
            token: new.token,
        };
        players_sea::create_player(&self.db, dto)
            .await
            .map(Player::from)
            .map_err(map_db_err)
    }

    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        Ok(players_sea::find_by_id(&self.db, id.get())
            .await
            .map_err(map_db_err)?
            .map(Player::from))
    }

    async fn find_credentials(&self, name: &str) -> Result<Option<PlayerCredentials>, DomainError> {
        Ok(players_sea::find_by_name(&self.db, name)
            .await
            .map_err(map_db_err)?
            .map(|model| {
                let password_hash = model.password_hash.clone();
                PlayerCredentials {
                    player: Player::from(model),
                    password_hash,
                }
            }))
    }

    async fn find_player_by_token(&self, token: &str) -> Result<Option<Player>, DomainError> {
        Ok(players_sea::find_by_token(&self.db, token)
            .await
            .map_err(map_db_err)?
            .map(Player::from))
    }
}
