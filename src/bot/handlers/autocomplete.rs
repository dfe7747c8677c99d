//! Autocomplete handlers for Discord slash command parameters.
//!
//! Each handler answers with at most 25 titles, Discord's limit for
//! autocomplete choices. Titles longer than 100 characters cannot be sent as a
//! choice and are dropped. Database failures produce an empty list rather than
//! an error, since autocomplete has no way to report one.

use crate::{
    bot::BotData,
    core::{catalog, ownership},
    errors::Error,
};

/// Discord's cap on autocomplete choices.
pub const MAX_CHOICES: usize = 25;

/// Discord's cap on the length of a single choice.
const MAX_CHOICE_LEN: usize = 100;

/// Keeps the titles Discord can display, up to [`MAX_CHOICES`].
fn to_choices(titles: Vec<String>) -> Vec<String> {
    titles
        .into_iter()
        .filter(|title| title.chars().count() <= MAX_CHOICE_LEN)
        .take(MAX_CHOICES)
        .collect()
}

/// Suggests titles that at least one member owns.
///
/// Used by `/ping`, so only games someone could actually be pinged for are
/// offered. Reads the autocomplete projection rather than the full catalog.
pub async fn autocomplete_owned_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    ownership::autocomplete_titles(db, partial, MAX_CHOICES as u64 * 2)
        .await
        .map(to_choices)
        .unwrap_or_default()
}

/// Suggests titles from the whole catalog, shortest matches first.
pub async fn autocomplete_catalog_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    catalog::search_catalog_titles(db, partial, false, MAX_CHOICES as u64 * 2)
        .await
        .map(to_choices)
        .unwrap_or_default()
}

/// Suggests custom (non-Steam) titles for `/game remove`.
pub async fn autocomplete_custom_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    catalog::search_catalog_titles(db, partial, true, MAX_CHOICES as u64 * 2)
        .await
        .map(to_choices)
        .unwrap_or_default()
}

/// Suggests games the invoking member has registered.
pub async fn autocomplete_registered_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let discord_id = ctx.author().id.to_string();

    let Ok(games) = ownership::games_of(db, &discord_id).await else {
        return Vec::new();
    };

    let partial_lower = partial.trim().to_lowercase();
    to_choices(
        games
            .into_iter()
            .map(|game| game.title)
            .filter(|title| title.to_lowercase().contains(&partial_lower))
            .collect(),
    )
}
