//! General Discord commands - help and other utility commands.
//! This module contains simple commands that don't require database operations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Lobby Locator Help**\n\
        Find out who else owns a game and ping them to play.\n\n\
        **Steam**\n\
        • `/steam set <id or profile URL>` - Links your Steam account and imports your library.\n\
        • `/steam remove` - Unlinks your Steam account and forgets your games.\n\
        • `/steam refresh` - Not available yet; libraries re-sync nightly.\n\n\
        **Games**\n\
        • `/game register <title>` - Adds a game to your list.\n\
        • `/game unregister <title>` - Removes a game from your list.\n\
        • `/game list [member]` - Shows a member's games.\n\
        • `/game add <title>` / `/game remove <title>` - Manage custom games (administrators).\n\n\
        **Playing**\n\
        • `/ping <title>` - Pings everyone who owns a game.\n\
        • `/help` - Shows this help message.";

        ctx.send(
            poise::CreateReply::default()
                .content(help_text)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
