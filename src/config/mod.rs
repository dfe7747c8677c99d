//! Application configuration loaded from the environment.
//!
//! `main` calls `dotenvy::dotenv()` before [`AppConfig::from_env`], so values may
//! come from a `.env` file or from the real process environment. Every required
//! variable is checked before failing, so a single run reports all of them.

/// Database connection, schema creation, and table statistics
pub mod database;

use crate::errors::{Error, Result};
use tracing::{debug, warn};

/// Discord bot token.
pub const DISCORD_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
/// Steam Web API key.
pub const STEAM_API_KEY_VAR: &str = "STEAM_API_KEY";
/// `SeaORM` connection string for the `SQLite` database.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Optional guild to register commands in (faster propagation while developing).
pub const DEV_GUILD_ID_VAR: &str = "DEV_GUILD_ID";
/// Optional cron expression overriding the catalog refresh schedule.
pub const REFRESH_CRON_VAR: &str = "CATALOG_REFRESH_CRON";

/// Daily at 04:00 (seconds field first, as `tokio-cron-scheduler` expects).
pub const DEFAULT_REFRESH_CRON: &str = "0 0 4 * * *";

const REQUIRED_VARS: [&str; 3] = [DISCORD_TOKEN_VAR, STEAM_API_KEY_VAR, DATABASE_URL_VAR];

/// Everything the bot needs to start.
#[derive(Clone)]
pub struct AppConfig {
    /// Token used to log in to the Discord gateway
    pub discord_token: String,
    /// Key sent with every authenticated Steam Web API request
    pub steam_api_key: String,
    /// Where the `SQLite` database lives
    pub database_url: String,
    /// Guild for command registration; `None` registers globally
    pub dev_guild_id: Option<u64>,
    /// Cron schedule for the catalog refresh job
    pub refresh_cron: String,
}

// Secrets stay out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("dev_guild_id", &self.dev_guild_id)
            .field("refresh_cron", &self.refresh_cron)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as missing. An unparsable `DEV_GUILD_ID` is a
    /// configuration error rather than being silently ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| get(*name).is_none())
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            for name in &missing {
                warn!("Could not find environment variable: {name}");
            }
            return Err(Error::MissingEnv { names: missing });
        }

        let dev_guild_id = get(DEV_GUILD_ID_VAR)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| Error::Config {
                    message: format!("{DEV_GUILD_ID_VAR} must be a numeric guild id: {e}"),
                })
            })
            .transpose()?;

        let refresh_cron =
            get(REFRESH_CRON_VAR).unwrap_or_else(|| DEFAULT_REFRESH_CRON.to_string());

        let config = Self {
            discord_token: get(DISCORD_TOKEN_VAR).unwrap_or_default(),
            steam_api_key: get(STEAM_API_KEY_VAR).unwrap_or_default(),
            database_url: get(DATABASE_URL_VAR).unwrap_or_default(),
            dev_guild_id,
            refresh_cron,
        };
        debug!(?config, "Configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_required_present() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "token"),
            ("STEAM_API_KEY", "key"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();

        assert_eq!(config.discord_token, "token");
        assert_eq!(config.steam_api_key, "key");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.dev_guild_id, None);
        assert_eq!(config.refresh_cron, DEFAULT_REFRESH_CRON);
    }

    #[test]
    fn test_missing_vars_are_all_reported() {
        let result = AppConfig::from_lookup(lookup_from(&[("DISCORD_BOT_TOKEN", "token")]));

        match result {
            Err(Error::MissingEnv { names }) => {
                assert_eq!(names, vec!["STEAM_API_KEY", "DATABASE_URL"]);
            }
            other => panic!("expected MissingEnv, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "token"),
            ("STEAM_API_KEY", "   "),
            ("DATABASE_URL", "sqlite::memory:"),
        ]));
        assert!(matches!(result, Err(Error::MissingEnv { names }) if names == ["STEAM_API_KEY"]));
    }

    #[test]
    fn test_blank_database_url_is_missing() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "token"),
            ("STEAM_API_KEY", "key"),
            ("DATABASE_URL", ""),
        ]));
        assert!(matches!(result, Err(Error::MissingEnv { names }) if names == ["DATABASE_URL"]));
    }

    #[test]
    fn test_optional_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "token"),
            ("STEAM_API_KEY", "key"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DEV_GUILD_ID", "1046992676865720420"),
            ("CATALOG_REFRESH_CRON", "0 30 2 * * *"),
        ]))
        .unwrap();
        assert_eq!(config.dev_guild_id, Some(1_046_992_676_865_720_420));
        assert_eq!(config.refresh_cron, "0 30 2 * * *");
    }

    #[test]
    fn test_bad_guild_id_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "token"),
            ("STEAM_API_KEY", "key"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DEV_GUILD_ID", "my-guild"),
        ]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_BOT_TOKEN", "super-secret-token"),
            ("STEAM_API_KEY", "super-secret-key"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("sqlite::memory:"));
    }
}
