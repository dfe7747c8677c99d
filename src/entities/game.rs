//! Game entity - One title in the merged catalog.
//!
//! Steam titles carry their app id and are refreshed from `GetAppList`.
//! Custom titles are curated by administrators and have no app id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Game database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_games")]
pub struct Model {
    /// Surrogate key referenced by ownership and autocomplete rows
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Steam app id, `None` for custom games
    #[sea_orm(unique)]
    pub steam_app_id: Option<i64>,
    /// Display title, unique across Steam and custom games
    #[sea_orm(unique)]
    pub title: String,
    /// Lowercase copy of `title` for case-insensitive lookups
    pub title_lower: String,
}

impl Model {
    /// Whether this title was added by an administrator rather than Steam.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        self.steam_app_id.is_none()
    }
}

/// Defines relationships between Game and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One game is owned by many users
    #[sea_orm(has_many = "super::owned_game::Entity")]
    OwnedGames,
    /// At most one autocomplete row mirrors this game
    #[sea_orm(has_one = "super::game_autocomplete::Entity")]
    Autocomplete,
}

impl Related<super::owned_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedGames.def()
    }
}

impl Related<super::game_autocomplete::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Autocomplete.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
