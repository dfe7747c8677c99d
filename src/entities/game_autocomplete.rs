//! Autocomplete projection - Games that currently have at least one owner.
//!
//! Never written by application code; the triggers created in
//! `config::database::create_triggers` keep it in step with `tb_owned_games`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Autocomplete row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_games_autocomplete")]
pub struct Model {
    /// Game this row mirrors
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: i64,
    /// Copy of the game's title
    pub title: String,
}

/// Each autocomplete row belongs to one game
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Mirrored game
    #[sea_orm(
        belongs_to = "super::game::Entity",
        from = "Column::GameId",
        to = "super::game::Column::Id",
        on_delete = "Cascade"
    )]
    Game,
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
