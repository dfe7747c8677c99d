//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// `/game` - registering and curating games
pub mod game;

/// General utility commands
pub mod general;

/// `/ping` - pinging the owners of a game
pub mod ping;

/// `/steam` - linking a Steam account
pub mod steam;

// Export commands
pub use game::*;
pub use general::*;
pub use ping::*;
pub use steam::*;

use crate::{bot::BotData, errors::Error};

/// Every command the bot registers with Discord.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![steam(), game(), ping(), help()]
}
