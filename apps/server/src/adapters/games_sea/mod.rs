//! SeaORM adapter for games - generic over ConnectionTrait.

use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::games::{self, GameState};

pub mod dto;

pub use dto::{GameCreate, GameUpdateBoard};

// Adapter functions return DbErr; the store maps to DomainError via map_db_err.

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        guid: Set(dto.guid),
        first_player_id: Set(dto.first_player_id),
        second_player_id: Set(dto.second_player_id),
        board: Set(dto.board),
        state: Set(GameState::InProgress),
        created_at: Set(now),
        updated_at: Set(now),
    };

    game_active.insert(conn).await
}

pub async fn find_by_guid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    guid: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::Guid.eq(guid))
        .one(conn)
        .await
}

pub async fn find_by_state<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    state: GameState,
) -> Result<Vec<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::State.eq(state))
        .order_by_asc(games::Column::Id)
        .all(conn)
        .await
}

pub async fn find_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(
            Condition::any()
                .add(games::Column::FirstPlayerId.eq(player_id))
                .add(games::Column::SecondPlayerId.eq(player_id)),
        )
        .order_by_asc(games::Column::Id)
        .all(conn)
        .await
}

/// Overwrite board and state. `RecordNotFound` when the guid is unknown.
pub async fn update_board<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdateBoard,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = games::Entity::update_many()
        .col_expr(games::Column::Board, Expr::value(dto.board))
        .col_expr(games::Column::State, Expr::value(dto.state))
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .filter(games::Column::Guid.eq(dto.guid.as_str()))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(format!(
            "game {} not found",
            dto.guid
        )));
    }

    find_by_guid(conn, &dto.guid)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("game {} not found", dto.guid)))
}
