//! Title disambiguation through a Discord select menu.
//!
//! When fuzzy matching yields several candidates the invoker picks one from an
//! ephemeral dropdown. Only the invoker's selection is accepted, and the menu
//! expires after [`SELECT_TIMEOUT`].

use crate::{
    bot::BotData,
    core::matching::TitleMatch,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::debug;

/// How long the invoker has to choose.
pub const SELECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Discord's cap on a select option label.
const MAX_LABEL_LEN: usize = 100;

fn option_label(title: &str) -> String {
    if title.chars().count() <= MAX_LABEL_LEN {
        title.to_string()
    } else {
        let mut label: String = title.chars().take(MAX_LABEL_LEN - 1).collect();
        label.push('…');
        label
    }
}

/// Turns a [`TitleMatch`] into a single title, asking the invoker to pick when
/// the input was ambiguous.
///
/// Returns `Ok(None)` after telling the invoker why when nothing matched, the
/// menu timed out, or an unexpected value came back.
pub async fn pick_title(
    ctx: poise::Context<'_, BotData, Error>,
    input: &str,
    resolved: TitleMatch,
) -> Result<Option<String>> {
    match resolved {
        TitleMatch::Exact(title) => Ok(Some(title)),
        TitleMatch::Candidates(candidates) => {
            let prompt = format!("🔎 No exact match for **{input}**. Did you mean one of these?");
            choose_title(ctx, &prompt, &candidates).await
        }
        TitleMatch::NoMatch => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("❌ Could not find a game called **{input}**."))
                    .ephemeral(true),
            )
            .await?;
            Ok(None)
        }
    }
}

/// Shows `candidates` in a select menu and waits for the invoker's choice.
pub async fn choose_title(
    ctx: poise::Context<'_, BotData, Error>,
    prompt: &str,
    candidates: &[String],
) -> Result<Option<String>> {
    let custom_id = format!("{}-title-select", ctx.id());

    let options = candidates
        .iter()
        .enumerate()
        .map(|(index, title)| serenity::CreateSelectMenuOption::new(option_label(title), index.to_string()))
        .collect();
    let menu = serenity::CreateSelectMenu::new(
        custom_id.clone(),
        serenity::CreateSelectMenuKind::String { options },
    )
    .placeholder("Choose a game");

    let handle = ctx
        .send(
            poise::CreateReply::default()
                .content(prompt)
                .components(vec![serenity::CreateActionRow::SelectMenu(menu)])
                .ephemeral(true),
        )
        .await?;

    let filter_id = custom_id.clone();
    let interaction = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
        .author_id(ctx.author().id)
        .filter(move |interaction| interaction.data.custom_id == filter_id)
        .timeout(SELECT_TIMEOUT)
        .next()
        .await;

    let Some(interaction) = interaction else {
        handle
            .edit(
                ctx,
                poise::CreateReply::default()
                    .content("⌛ No game selected in time.")
                    .components(Vec::new()),
            )
            .await?;
        return Ok(None);
    };

    let chosen = match &interaction.data.kind {
        serenity::ComponentInteractionDataKind::StringSelect { values } => values
            .first()
            .and_then(|value| value.parse::<usize>().ok())
            .and_then(|index| candidates.get(index))
            .cloned(),
        _ => None,
    };

    let confirmation = chosen.as_ref().map_or_else(
        || "❌ That selection could not be read.".to_string(),
        |title| format!("Selected **{title}**."),
    );
    interaction
        .create_response(
            ctx.serenity_context(),
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(confirmation)
                    .components(Vec::new()),
            ),
        )
        .await?;

    debug!(?chosen, "Title selected from menu");
    Ok(chosen)
}
