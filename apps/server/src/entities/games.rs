use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum GameState {
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "first_won")]
    FirstWon,
    #[sea_orm(string_value = "second_won")]
    SecondWon,
    #[sea_orm(string_value = "draw")]
    Draw,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub guid: String,
    #[sea_orm(column_name = "first_player_id")]
    pub first_player_id: i64,
    #[sea_orm(column_name = "second_player_id")]
    pub second_player_id: i64,
    #[sea_orm(column_type = "Text")]
    pub board: String,
    pub state: GameState,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::FirstPlayerId",
        to = "super::players::Column::Id"
    )]
    FirstPlayer,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::SecondPlayerId",
        to = "super::players::Column::Id"
    )]
    SecondPlayer,
}

impl ActiveModelBehavior for ActiveModel {}
