//! Steam Discord commands - linking and unlinking a member's Steam account.
//!
//! All replies are ephemeral; a Steam ID is nobody else's business.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{sync::{self, LinkOutcome}, user},
        errors::{Error, Result},
    };
    use tracing::info;

    async fn reply(ctx: poise::Context<'_, BotData, Error>, content: String) -> Result<()> {
        ctx.send(
            poise::CreateReply::default()
                .content(content)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Parent command for managing your linked Steam account.
    #[poise::command(slash_command, subcommands("steam_set", "steam_remove", "steam_refresh"), subcommand_required)]
    pub async fn steam(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Links your Steam account and imports your game library.
    ///
    /// Accepts a Steam64 ID, a custom profile name, or a profile URL such as
    /// `https://steamcommunity.com/id/<name>`.
    #[poise::command(slash_command, rename = "set")]
    pub async fn steam_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Steam ID, custom URL name, or profile URL"] steam_id: String,
    ) -> Result<()> {
        // Steam lookups can take longer than Discord's 3 second window
        ctx.defer_ephemeral().await?;

        let data = ctx.data();
        let discord_id = ctx.author().id.to_string();
        let outcome =
            sync::link_steam_account(&data.database, &data.steam, &discord_id, &steam_id).await?;

        let message = match outcome {
            LinkOutcome::Linked { games_synced } => {
                info!(user = %ctx.author().name, "Steam account linked");
                format!(
                    "✅ Steam account linked. Imported **{games_synced}** game{}.\n\
                    If that looks low, make sure your Steam game details are public.",
                    if games_synced == 1 { "" } else { "s" }
                )
            }
            LinkOutcome::Unresolved => format!(
                "❌ Could not find a Steam account for **{steam_id}**. \
                Try your Steam64 ID or the full profile URL."
            ),
            LinkOutcome::InvalidAccount => {
                format!("❌ **{steam_id}** is not a valid Steam account.")
            }
            LinkOutcome::AlreadyClaimed => {
                "❌ That Steam account is already linked to another member.".to_string()
            }
        };
        reply(ctx, message).await
    }

    /// Unlinks your Steam account and removes all of your registered games.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn steam_remove(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let discord_id = ctx.author().id.to_string();

        let message = if user::remove_user(&ctx.data().database, &discord_id).await? {
            info!(user = %ctx.author().name, "Steam account removed");
            "✅ Your Steam account and registered games have been removed.".to_string()
        } else {
            "ℹ️ You have no linked account to remove.".to_string()
        };
        reply(ctx, message).await
    }

    /// Re-imports your Steam library.
    #[poise::command(slash_command, rename = "refresh")]
    pub async fn steam_refresh(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        reply(
            ctx,
            "ℹ️ Manual refresh is not available yet. Libraries re-sync every night; \
            run `/steam set` again to import new games right away."
                .to_string(),
        )
        .await
    }
}

// Re-export all commands
pub use inner::*;
