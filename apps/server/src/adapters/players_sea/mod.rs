//! SeaORM adapter for players - generic over ConnectionTrait.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::entities::players;

// Adapter functions return DbErr; the store maps to DomainError via map_db_err.

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub name: String,
    pub password_hash: String,
    pub token: String,
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player_active = players::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        password_hash: Set(dto.password_hash),
        token: Set(dto.token),
        created_at: Set(now),
        updated_at: Set(now),
    };

    player_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Name.eq(name))
        .one(conn)
        .await
}

pub async fn find_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Token.eq(token))
        .one(conn)
        .await
}
