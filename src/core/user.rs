//! User business logic - Linking Discord members to Steam accounts.
//!
//! Provides functions for creating, retrieving, and removing users. A Steam ID
//! may be linked to one Discord member only; that rule lives in the schema and
//! surfaces here as an `Ok(false)` from [`upsert_steam_id`].

use crate::{
    config::database::is_open,
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*, sea_query::OnConflict};
use tracing::{debug, warn};

/// Associates a Discord ID with a Steam64 ID, creating the user if needed.
///
/// Calling this again for the same Discord ID replaces the stored Steam ID
/// rather than adding a row.
///
/// # Returns
/// * `Ok(true)` - The association was stored
/// * `Ok(false)` - The Steam ID already belongs to another Discord user, or the
///   connection is not open
///
/// # Errors
/// Returns `Error::InvalidInput` if either id is empty, or a database error for
/// anything other than a uniqueness conflict.
pub async fn upsert_steam_id(
    db: &DatabaseConnection,
    discord_id: &str,
    steam_id: &str,
) -> Result<bool> {
    if discord_id.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Discord ID cannot be empty".to_string(),
        });
    }
    if steam_id.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Steam ID cannot be empty".to_string(),
        });
    }
    if !is_open(db) {
        return Ok(false);
    }

    let model = user::ActiveModel {
        discord_id: Set(discord_id.trim().to_string()),
        steam_id: Set(Some(steam_id.trim().to_string())),
        ..Default::default()
    };

    let result = User::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::DiscordId)
                .update_column(user::Column::SteamId)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => {
            debug!(discord_id, steam_id, "Stored Steam ID");
            Ok(true)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!(discord_id, steam_id, "Steam ID is already linked to another user");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Finds a user by Discord ID.
pub async fn get_user_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    if !is_open(db) {
        return Ok(None);
    }

    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by Discord ID, creating one without a Steam ID if absent.
///
/// Used by custom-game registration, which does not require a Steam account.
pub async fn get_or_create_user(db: &DatabaseConnection, discord_id: &str) -> Result<user::Model> {
    if discord_id.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Discord ID cannot be empty".to_string(),
        });
    }

    if let Some(existing) = get_user_by_discord_id(db, discord_id).await? {
        return Ok(existing);
    }

    let model = user::ActiveModel {
        discord_id: Set(discord_id.to_string()),
        steam_id: Set(None),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Deletes a user; their ownership rows go with them through the foreign key
/// cascade.
///
/// Returns `Ok(false)` if no such user exists or the connection is not open.
pub async fn remove_user(db: &DatabaseConnection, discord_id: &str) -> Result<bool> {
    if !is_open(db) {
        return Ok(false);
    }

    let result = User::delete_many()
        .filter(user::Column::DiscordId.eq(discord_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// All users that have a Steam ID, ordered by Discord ID.
pub async fn users_with_steam_ids(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    if !is_open(db) {
        return Ok(Vec::new());
    }

    User::find()
        .filter(user::Column::SteamId.is_not_null())
        .order_by_asc(user::Column::DiscordId)
        .all(db)
        .await
        .map_err(Into::into)
}
