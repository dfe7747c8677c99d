//! Ownership business logic - Which users own which games.
//!
//! Ownership rows are written two ways: in bulk from a Steam library
//! ([`record_owned_games`]) and one at a time by `/game register`. Every insert
//! and delete on `tb_owned_games` is mirrored into the autocomplete projection
//! by database triggers, so nothing here touches that table directly.

use crate::{
    config::database::is_open,
    core::{
        catalog,
        matching::{self, TitleMatch},
        user,
    },
    entities::{Game, GameAutocomplete, OwnedGame, User, game, game_autocomplete, owned_game},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    QueryOrder, QuerySelect, Set, Statement, Value, prelude::*, sea_query::Query,
};
use tracing::debug;

/// App ids per `INSERT ... SELECT` statement.
const RECORD_BATCH_SIZE: usize = 500;

/// Outcome of registering a game for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A new ownership row was created
    Registered,
    /// The user had already registered this game
    AlreadyRegistered,
}

/// One entry in a user's game list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedGameSummary {
    /// Game title
    pub title: String,
    /// Whether the title is a custom (non-Steam) game
    pub is_custom: bool,
    /// When the ownership was recorded
    pub registered_at: DateTime<Utc>,
}

/// Links the user holding `steam_id` to every known game in `app_ids`.
///
/// App ids missing from the catalog and games the user already owns are
/// ignored. Returns the number of rows inserted, or `0` if the Steam ID is not
/// linked to anyone or the connection is not open.
pub async fn record_owned_games(
    db: &DatabaseConnection,
    app_ids: &[u32],
    steam_id: &str,
) -> Result<u64> {
    if !is_open(db) || app_ids.is_empty() {
        return Ok(0);
    }

    let backend = db.get_database_backend();
    let now = Utc::now();
    let mut inserted = 0;

    for batch in app_ids.chunks(RECORD_BATCH_SIZE) {
        let placeholders = vec!["?"; batch.len()].join(", ");
        let sql = format!(
            "INSERT OR IGNORE INTO tb_owned_games (user_id, game_id, registered_at) \
             SELECT u.id, g.id, ? FROM tb_users u \
             JOIN tb_games g ON g.steam_app_id IN ({placeholders}) \
             WHERE u.steam_id = ?"
        );

        let mut values: Vec<Value> = Vec::with_capacity(batch.len() + 2);
        values.push(now.into());
        values.extend(batch.iter().map(|id| Value::from(i64::from(*id))));
        values.push(steam_id.into());

        let result = db
            .execute(Statement::from_sql_and_values(backend, sql, values))
            .await?;
        inserted += result.rows_affected();
    }

    debug!(steam_id, offered = app_ids.len(), inserted, "Recorded owned games");
    Ok(inserted)
}

/// Drops a user's Steam-sourced ownership rows, leaving custom-game
/// registrations in place.
pub async fn clear_steam_ownership(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    if !is_open(db) {
        return Ok(0);
    }

    let steam_games = Query::select()
        .column(game::Column::Id)
        .from(Game)
        .and_where(game::Column::SteamAppId.is_not_null())
        .to_owned();

    let result = OwnedGame::delete_many()
        .filter(owned_game::Column::UserId.eq(user_id))
        .filter(owned_game::Column::GameId.in_subquery(steam_games))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Registers `game_id` as owned by the Discord user, creating the user row if
/// this is their first interaction.
pub async fn register_game(
    db: &DatabaseConnection,
    discord_id: &str,
    game_id: i64,
) -> Result<RegisterOutcome> {
    let owner = user::get_or_create_user(db, discord_id).await?;

    let existing = OwnedGame::find_by_id((owner.id, game_id)).one(db).await?;
    if existing.is_some() {
        return Ok(RegisterOutcome::AlreadyRegistered);
    }

    let model = owned_game::ActiveModel {
        user_id: Set(owner.id),
        game_id: Set(game_id),
        registered_at: Set(Utc::now()),
    };
    model.insert(db).await?;
    Ok(RegisterOutcome::Registered)
}

/// Removes a registration. Returns `Ok(false)` if the user did not own the game.
pub async fn unregister_game(
    db: &DatabaseConnection,
    discord_id: &str,
    game_id: i64,
) -> Result<bool> {
    let Some(owner) = user::get_user_by_discord_id(db, discord_id).await? else {
        return Ok(false);
    };

    let result = OwnedGame::delete_by_id((owner.id, game_id)).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Discord IDs of everyone who owns `game_id`, in a stable order.
pub async fn owners_of(db: &DatabaseConnection, game_id: i64) -> Result<Vec<String>> {
    if !is_open(db) {
        return Ok(Vec::new());
    }

    User::find()
        .inner_join(OwnedGame)
        .filter(owned_game::Column::GameId.eq(game_id))
        .order_by_asc(crate::entities::user::Column::DiscordId)
        .all(db)
        .await
        .map(|users| users.into_iter().map(|u| u.discord_id).collect())
        .map_err(Into::into)
}

/// Every game the Discord user owns, sorted by title.
pub async fn games_of(db: &DatabaseConnection, discord_id: &str) -> Result<Vec<OwnedGameSummary>> {
    let Some(owner) = user::get_user_by_discord_id(db, discord_id).await? else {
        return Ok(Vec::new());
    };

    let rows = OwnedGame::find()
        .filter(owned_game::Column::UserId.eq(owner.id))
        .find_also_related(Game)
        .all(db)
        .await?;

    let mut games: Vec<OwnedGameSummary> = rows
        .into_iter()
        .map(|(owned, game)| {
            let game = game.ok_or_else(|| Error::GameNotFound {
                title: format!("id {}", owned.game_id),
            })?;
            Ok(OwnedGameSummary {
                is_custom: game.is_custom(),
                title: game.title,
                registered_at: owned.registered_at,
            })
        })
        .collect::<Result<_>>()?;

    games.sort_by_key(|g| g.title.to_lowercase());
    Ok(games)
}

/// Titles with at least one owner whose name contains `partial`
/// (case-insensitive, wildcards taken literally), read from the autocomplete
/// projection.
pub async fn autocomplete_titles(
    db: &DatabaseConnection,
    partial: &str,
    limit: u64,
) -> Result<Vec<String>> {
    if !is_open(db) {
        return Ok(Vec::new());
    }

    let pattern = catalog::contains_pattern(&partial.trim().to_lowercase());
    GameAutocomplete::find()
        .select_only()
        .column(game_autocomplete::Column::Title)
        .inner_join(Game)
        .filter(game::Column::TitleLower.like(pattern))
        .order_by_asc(game_autocomplete::Column::Title)
        .limit(limit)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every title with at least one owner, alphabetically.
pub async fn owned_titles(db: &DatabaseConnection) -> Result<Vec<String>> {
    if !is_open(db) {
        return Ok(Vec::new());
    }

    GameAutocomplete::find()
        .select_only()
        .column(game_autocomplete::Column::Title)
        .order_by_asc(game_autocomplete::Column::Title)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolves user input against titles somebody owns.
pub async fn resolve_owned_title(db: &DatabaseConnection, input: &str) -> Result<TitleMatch> {
    let titles = owned_titles(db).await?;
    Ok(matching::resolve_title(input, titles.iter().map(String::as_str)))
}
