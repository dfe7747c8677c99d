//! User entity - A Discord member known to the bot.
//!
//! A user row exists once the member has set a Steam ID or registered a game.
//! Deleting it cascades to every ownership row that references it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_users")]
pub struct Model {
    /// Surrogate key referenced by `tb_owned_games`
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord snowflake, stored as text
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Steam64 ID; a Steam account can belong to one Discord user only
    #[sea_orm(unique)]
    pub steam_id: Option<String>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many games
    #[sea_orm(has_many = "super::owned_game::Entity")]
    OwnedGames,
}

impl Related<super::owned_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedGames.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
