//! Shared test utilities for `LobbyLocator`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{catalog, user},
    entities,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;

/// Creates an in-memory `SQLite` database with all tables and triggers
/// initialized. This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    crate::config::database::create_connection("sqlite::memory:").await
}

/// Creates a test user, optionally linked to a Steam ID.
///
/// # Arguments
/// * `db` - Database connection
/// * `discord_id` - Discord user ID
/// * `steam_id` - Steam64 ID, or `None` for a custom-games-only user
pub async fn create_test_user(
    db: &DatabaseConnection,
    discord_id: &str,
    steam_id: Option<&str>,
) -> Result<entities::user::Model> {
    if let Some(steam_id) = steam_id {
        user::upsert_steam_id(db, discord_id, steam_id).await?;
    }
    user::get_or_create_user(db, discord_id).await
}

/// Merges `(app id, title)` pairs into the catalog as if they came from Steam.
/// Returns the number of games inserted.
pub async fn seed_catalog(db: &DatabaseConnection, apps: &[(u32, &str)]) -> Result<u64> {
    let apps: BTreeMap<u32, String> = apps
        .iter()
        .map(|(id, title)| (*id, (*title).to_string()))
        .collect();
    catalog::merge_app_catalog(db, &apps).await
}

/// Creates a custom game, failing if the title is already taken.
pub async fn create_custom_game(
    db: &DatabaseConnection,
    title: &str,
) -> Result<entities::game::Model> {
    match catalog::add_custom_game(db, title).await? {
        catalog::AddOutcome::Added(game) => Ok(game),
        catalog::AddOutcome::AlreadyExists(_) => Err(Error::InvalidInput {
            message: format!("{title} already exists"),
        }),
    }
}
