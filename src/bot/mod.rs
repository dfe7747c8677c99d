//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for Lobby Locator, including all
//! slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (steam, game, ping, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, select menus)
pub mod handlers;

use crate::{
    config::AppConfig,
    errors::{Error, Result},
    steam::SteamClient,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the Steam client, and the
/// application configuration.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Client for the Steam Web API
    pub steam: SteamClient,
    /// Configuration the bot was started with
    pub config: AppConfig,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, steam: SteamClient, config: AppConfig) -> Self {
        Self {
            database,
            steam,
            config,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().qualified_name, error);
            let reply = poise::CreateReply::default()
                .content("❌ Something went wrong while running that command.")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord, registers the slash commands and runs until the
/// gateway connection ends.
///
/// Commands are registered in `dev_guild_id` when configured (instant
/// propagation), otherwise globally.
#[instrument(skip_all)]
pub async fn run_bot(data: BotData) -> Result<()> {
    let token = data.config.discord_token.clone();
    let dev_guild_id = data.config.dev_guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                let commands = &framework.options().commands;
                if let Some(guild_id) = dev_guild_id {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(ctx, commands, guild_id).await?;
                    info!("Registered commands in guild {guild_id}");
                } else {
                    poise::builtins::register_globally(ctx, commands).await?;
                    info!("Registered commands globally");
                }
                Ok(data)
            })
        })
        .build();

    // Slash commands need no privileged intents
    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
