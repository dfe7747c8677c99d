//! The `/ping` command - pinging everyone who owns a game.

/// Discord rejects messages longer than this.
const MAX_MESSAGE_LEN: usize = 2000;

/// Builds the messages that mention `owner_ids`, split so none exceeds
/// Discord's length limit. The first message carries the header.
///
/// Returns an empty list when there is nobody to ping.
#[must_use]
pub fn format_ping_messages(header: &str, owner_ids: &[String]) -> Vec<String> {
    if owner_ids.is_empty() {
        return Vec::new();
    }

    let mut messages = Vec::new();
    let mut current = header.to_string();
    for id in owner_ids {
        let mention = format!(" <@{id}>");
        if current.len() + mention.len() > MAX_MESSAGE_LEN {
            messages.push(std::mem::take(&mut current));
            current.push_str(mention.trim_start());
        } else {
            current.push_str(&mention);
        }
    }
    messages.push(current);
    messages
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::format_ping_messages;
    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, select},
        },
        core::{catalog, ownership},
        errors::{Error, Result},
    };
    use tracing::info;

    /// Pings every member who owns a game.
    #[poise::command(slash_command, guild_only)]
    pub async fn ping(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Game you want to play"]
        #[autocomplete = "autocomplete::autocomplete_owned_title"]
        title: String,
    ) -> Result<()> {
        // The ping itself is public, so the deferred response is too
        ctx.defer().await?;

        let db = &ctx.data().database;
        let resolved = ownership::resolve_owned_title(db, &title).await?;
        let Some(chosen) = select::pick_title(ctx, &title, resolved).await? else {
            return Ok(());
        };
        let Some(game) = catalog::find_game_by_exact_title(db, &chosen).await? else {
            ctx.say(format!("❌ **{chosen}** is no longer in the catalog.")).await?;
            return Ok(());
        };

        let author_id = ctx.author().id.to_string();
        let owners: Vec<String> = ownership::owners_of(db, game.id)
            .await?
            .into_iter()
            .filter(|id| *id != author_id)
            .collect();

        if owners.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("ℹ️ Nobody else has registered **{}** yet.", game.title))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let header = format!("🎮 <@{author_id}> wants to play **{}**!", game.title);
        for message in format_ping_messages(&header, &owners) {
            ctx.send(poise::CreateReply::default().content(message)).await?;
        }
        info!(title = %game.title, pinged = owners.len(), "Pinged game owners");
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|n| format!("{}", 100_000_000_000_000_000_u64 + n as u64)).collect()
    }

    #[test]
    fn test_single_message_for_few_owners() {
        let messages = format_ping_messages("Let's play", &ids(2));
        assert_eq!(
            messages,
            vec!["Let's play <@100000000000000000> <@100000000000000001>".to_string()]
        );
    }

    #[test]
    fn test_nobody_to_ping() {
        assert!(format_ping_messages("Let's play", &[]).is_empty());
    }

    #[test]
    fn test_long_lists_are_split() {
        let owners = ids(200);
        let messages = format_ping_messages("Let's play", &owners);

        assert!(messages.len() > 1);
        assert!(messages.iter().all(|m| m.len() <= MAX_MESSAGE_LEN));
        assert!(messages[0].starts_with("Let's play"));

        let mentioned: usize = messages.iter().map(|m| m.matches("<@").count()).sum();
        assert_eq!(mentioned, owners.len());
    }
}
