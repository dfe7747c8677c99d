//! Unified error type for the bot.
//!
//! Configuration problems are fatal at startup and database errors propagate to
//! the framework's error handler. Steam failures have no variant: the `steam`
//! module logs them and collapses them into empty results.

use thiserror::Error;

/// Every failure the crate can surface through `?`.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value was present but unusable.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the value
        message: String,
    },

    /// One or more required environment variables were not set.
    #[error("Missing required environment variables: {}", names.join(", "))]
    MissingEnv {
        /// Names of the variables that were absent or empty
        names: Vec<String>,
    },

    /// Caller passed a value an operation cannot accept (e.g. an empty id).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected value
        message: String,
    },

    /// A game title could not be found in the catalog.
    #[error("Game not found: {title}")]
    GameNotFound {
        /// Title that was looked up
        title: String,
    },

    /// Error returned by `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error returned by the cron scheduler.
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Error while writing a reply into a buffer.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error.
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
