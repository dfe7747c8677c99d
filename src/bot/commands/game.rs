//! Game Discord commands - the `/game` group.
//!
//! Members register and unregister games and list what someone owns.
//! Administrators curate custom games that are not on Steam.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, select},
        },
        core::{
            catalog::{self, AddOutcome, RemoveOutcome},
            matching::{self, TitleMatch},
            ownership::{self, RegisterOutcome},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    /// Discord rejects messages longer than this.
    const MAX_MESSAGE_LEN: usize = 2000;

    /// Sends an ephemeral reply.
    async fn reply(ctx: poise::Context<'_, BotData, Error>, content: String) -> Result<()> {
        ctx.send(
            poise::CreateReply::default()
                .content(content)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Parent command for registering and managing games.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("game_add", "game_remove", "game_register", "game_unregister", "game_list"),
        subcommand_required
    )]
    pub async fn game(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Adds a custom game that is not in the Steam catalog.
    #[poise::command(slash_command, rename = "add", required_permissions = "ADMINISTRATOR")]
    pub async fn game_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Title of the game"] title: String,
    ) -> Result<()> {
        if title.trim().is_empty() {
            return reply(ctx, "❌ Game title cannot be empty.".to_string()).await;
        }

        let message = match catalog::add_custom_game(&ctx.data().database, &title).await? {
            AddOutcome::Added(game) => {
                info!(title = %game.title, user = %ctx.author().name, "Custom game added");
                format!("✅ Added **{}**. Members can now `/game register` it.", game.title)
            }
            AddOutcome::AlreadyExists(game) => {
                format!("ℹ️ **{}** is already in the catalog.", game.title)
            }
        };
        reply(ctx, message).await
    }

    /// Removes a custom game and every registration of it.
    #[poise::command(slash_command, rename = "remove", required_permissions = "ADMINISTRATOR")]
    pub async fn game_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Custom game to remove"]
        #[autocomplete = "autocomplete::autocomplete_custom_title"]
        title: String,
    ) -> Result<()> {
        let message = match catalog::remove_custom_game(&ctx.data().database, &title).await? {
            RemoveOutcome::Removed(game) => {
                info!(title = %game.title, user = %ctx.author().name, "Custom game removed");
                format!("✅ Removed **{}**.", game.title)
            }
            RemoveOutcome::SteamGame(game) => format!(
                "❌ **{}** comes from the Steam catalog and cannot be removed.",
                game.title
            ),
            RemoveOutcome::NotFound => format!("❌ There is no game called **{title}**."),
        };
        reply(ctx, message).await
    }

    /// Adds a game to your list so others can ping you for it.
    #[poise::command(slash_command, rename = "register")]
    pub async fn game_register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Title of the game"]
        #[autocomplete = "autocomplete::autocomplete_catalog_title"]
        title: String,
    ) -> Result<()> {
        // A catalog miss falls back to a fuzzy scan of every title
        ctx.defer_ephemeral().await?;

        let db = &ctx.data().database;
        let resolved = catalog::resolve_in_catalog(db, &title).await?;
        let Some(chosen) = select::pick_title(ctx, &title, resolved).await? else {
            return Ok(());
        };
        let Some(game) = catalog::find_game_by_exact_title(db, &chosen).await? else {
            return reply(ctx, format!("❌ **{chosen}** is no longer in the catalog.")).await;
        };

        let discord_id = ctx.author().id.to_string();
        let message = match ownership::register_game(db, &discord_id, game.id).await? {
            RegisterOutcome::Registered => format!("✅ Registered **{}**.", game.title),
            RegisterOutcome::AlreadyRegistered => {
                format!("ℹ️ You have already registered **{}**.", game.title)
            }
        };
        reply(ctx, message).await
    }

    /// Removes a game from your list.
    #[poise::command(slash_command, rename = "unregister")]
    pub async fn game_unregister(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Title of the game"]
        #[autocomplete = "autocomplete::autocomplete_registered_title"]
        title: String,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;

        let db = &ctx.data().database;
        let discord_id = ctx.author().id.to_string();

        let owned: Vec<String> = ownership::games_of(db, &discord_id)
            .await?
            .into_iter()
            .map(|game| game.title)
            .collect();
        if owned.is_empty() {
            return reply(ctx, "ℹ️ You have no registered games.".to_string()).await;
        }

        let resolved = matching::resolve_title(&title, owned.iter().map(String::as_str));
        if resolved == TitleMatch::NoMatch {
            return reply(ctx, format!("❌ You have not registered **{title}**.")).await;
        }
        let Some(chosen) = select::pick_title(ctx, &title, resolved).await? else {
            return Ok(());
        };
        let Some(game) = catalog::find_game_by_exact_title(db, &chosen).await? else {
            return reply(ctx, format!("❌ **{chosen}** is no longer in the catalog.")).await;
        };

        let message = if ownership::unregister_game(db, &discord_id, game.id).await? {
            format!("✅ Unregistered **{}**.", game.title)
        } else {
            format!("ℹ️ You had not registered **{}**.", game.title)
        };
        reply(ctx, message).await
    }

    /// Lists the games a member has registered.
    #[poise::command(slash_command, rename = "list")]
    pub async fn game_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member to list (defaults to you)"] member: Option<serenity::User>,
    ) -> Result<()> {
        let target = member.as_ref().unwrap_or_else(|| ctx.author());
        let games = ownership::games_of(&ctx.data().database, &target.id.to_string()).await?;

        if games.is_empty() {
            return reply(ctx, format!("ℹ️ **{}** has no registered games.", target.name)).await;
        }

        let mut response = format!(
            "🎮 **{}** has {} game{}:\n",
            target.name,
            games.len(),
            if games.len() == 1 { "" } else { "s" }
        );
        for (shown, game) in games.iter().enumerate() {
            let mut line = String::new();
            write!(&mut line, "• {}", game.title)?;
            if game.is_custom {
                line.push_str(" *(custom)*");
            }
            line.push('\n');

            if response.len() + line.len() > MAX_MESSAGE_LEN - 40 {
                writeln!(&mut response, "…and {} more.", games.len() - shown)?;
                break;
            }
            response.push_str(&line);
        }
        reply(ctx, response).await
    }
}

// Re-export all commands
pub use inner::*;
