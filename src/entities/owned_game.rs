//! Owned game entity - Join table between users and the games they own.
//!
//! Rows come from `/game register` or from the Steam `GetOwnedGames` sync.
//! Inserts and deletes here drive the autocomplete triggers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ownership database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_owned_games")]
pub struct Model {
    /// Owning user
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// Owned game
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: i64,
    /// When the ownership was recorded
    pub registered_at: DateTimeUtc,
}

/// Defines relationships between OwnedGame and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Each row belongs to one game
    #[sea_orm(
        belongs_to = "super::game::Entity",
        from = "Column::GameId",
        to = "super::game::Column::Id",
        on_delete = "Cascade"
    )]
    Game,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
