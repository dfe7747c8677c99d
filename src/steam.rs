//! Steam Web API client.
//!
//! Every call degrades to an empty or negative result on failure: connection
//! errors, non-200 responses and unexpected bodies are logged at `warn!` and
//! never reach the caller as errors. A Steam outage therefore looks like
//! "no games" rather than a failed command.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Root of the public Steam Web API.
pub const STEAM_API_ROOT: &str = "https://api.steampowered.com";

const PROFILES_PREFIX: &str = "https://steamcommunity.com/profiles/";
const VANITY_PREFIX: &str = "https://steamcommunity.com/id/";

/// What a `/steam set` argument turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRef {
    /// A numeric Steam64 ID, either typed directly or taken from a
    /// `/profiles/` URL
    SteamId(String),
    /// A custom profile name that must be resolved through the API
    Vanity(String),
}

/// Classifies user input as a Steam64 ID or a vanity name.
///
/// Accepts `https://steamcommunity.com/profiles/<id>`,
/// `https://steamcommunity.com/id/<name>` (with or without a trailing slash),
/// a bare numeric id, or a bare vanity name. Returns `None` for empty input or
/// URLs pointing anywhere else.
#[must_use]
pub fn parse_profile_url(input: &str) -> Option<ProfileRef> {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    if let Some(id) = trimmed.strip_prefix(PROFILES_PREFIX) {
        return (!id.is_empty() && !id.contains('/')).then(|| ProfileRef::SteamId(id.to_string()));
    }
    if let Some(name) = trimmed.strip_prefix(VANITY_PREFIX) {
        return (!name.is_empty() && !name.contains('/')).then(|| ProfileRef::Vanity(name.to_string()));
    }
    if trimmed.contains('/') || trimmed.contains(char::is_whitespace) {
        return None;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        Some(ProfileRef::SteamId(trimmed.to_string()))
    } else {
        Some(ProfileRef::Vanity(trimmed.to_string()))
    }
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    response: T,
}

#[derive(Deserialize)]
struct PlayerSummaries {
    #[serde(default)]
    players: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct VanityResolution {
    success: i32,
    steamid: Option<String>,
}

#[derive(Deserialize)]
struct AppListResponse {
    applist: AppList,
}

#[derive(Deserialize)]
struct AppList {
    apps: Vec<App>,
}

#[derive(Deserialize)]
struct App {
    appid: u32,
    name: String,
}

#[derive(Deserialize)]
struct OwnedGames {
    #[serde(default)]
    games: Vec<OwnedApp>,
}

#[derive(Deserialize)]
struct OwnedApp {
    appid: u32,
}

/// Thin async wrapper over the handful of Steam endpoints the bot needs.
///
/// Cloning is cheap; the underlying `reqwest::Client` shares its pool.
#[derive(Clone)]
pub struct SteamClient {
    http: Client,
    api_key: String,
    api_root: String,
}

impl std::fmt::Debug for SteamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamClient")
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

impl SteamClient {
    /// Creates a client against the public Steam API.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_root(api_key, STEAM_API_ROOT)
    }

    /// Creates a client against another API root, such as a mock server.
    #[must_use]
    pub fn with_api_root(api_key: impl Into<String>, api_root: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key: api_key.into(),
            api_root: api_root.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Option<T> {
        let url = format!("{}{path}", self.api_root);
        let response = match self.http.get(&url).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, "Steam request failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            warn!(path, status = %response.status(), "Steam returned an error status");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(path, error = %e, "Unexpected Steam response body");
                None
            }
        }
    }

    /// Returns `true` if `steam_id` belongs to an existing Steam account.
    #[instrument(skip(self))]
    pub async fn is_valid_id(&self, steam_id: &str) -> bool {
        let summaries: Option<ApiResponse<PlayerSummaries>> = self
            .get_json(
                "/ISteamUser/GetPlayerSummaries/v0002/",
                &[("key", self.api_key.as_str()), ("steamids", steam_id)],
            )
            .await;
        summaries.is_some_and(|body| !body.response.players.is_empty())
    }

    /// Turns a profile URL, Steam64 ID or vanity name into a Steam64 ID.
    ///
    /// `/profiles/` URLs and bare numeric ids are returned without a network
    /// call. Vanity names go through `ResolveVanityURL`. Returns `None` when
    /// nothing could be resolved.
    #[instrument(skip(self))]
    pub async fn resolve_vanity_url(&self, input: &str) -> Option<String> {
        match parse_profile_url(input)? {
            ProfileRef::SteamId(id) => Some(id),
            ProfileRef::Vanity(name) => {
                let resolved: ApiResponse<VanityResolution> = self
                    .get_json(
                        "/ISteamUser/ResolveVanityURL/v1/",
                        &[("key", self.api_key.as_str()), ("vanityurl", name.as_str())],
                    )
                    .await?;
                let resolution = resolved.response;
                if resolution.success == 1 {
                    resolution.steamid.filter(|id| !id.is_empty())
                } else {
                    debug!(name = %name, "Vanity name did not resolve");
                    None
                }
            }
        }
    }

    /// Downloads the full Steam app list, keyed by app id. Apps with empty
    /// names are skipped; an empty map means the fetch failed.
    #[instrument(skip(self))]
    pub async fn fetch_app_catalog(&self) -> BTreeMap<u32, String> {
        let Some(body) = self
            .get_json::<AppListResponse>("/ISteamApps/GetAppList/v2/", &[])
            .await
        else {
            return BTreeMap::new();
        };

        body.applist
            .apps
            .into_iter()
            .filter(|app| !app.name.trim().is_empty())
            .map(|app| (app.appid, app.name))
            .collect()
    }

    /// App ids of every game `steam_id` owns, free-to-play titles included.
    /// Private profiles and failures both yield an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_owned_game_ids(&self, steam_id: &str) -> Vec<u32> {
        let owned: Option<ApiResponse<OwnedGames>> = self
            .get_json(
                "/IPlayerService/GetOwnedGames/v0001/",
                &[
                    ("key", self.api_key.as_str()),
                    ("steamid", steam_id),
                    ("include_played_free_games", "1"),
                    ("format", "json"),
                ],
            )
            .await;

        owned
            .map(|body| body.response.games.into_iter().map(|g| g.appid).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profiles_url() {
        assert_eq!(
            parse_profile_url("https://steamcommunity.com/profiles/76561198103635351"),
            Some(ProfileRef::SteamId("76561198103635351".to_string()))
        );
        assert_eq!(
            parse_profile_url("https://steamcommunity.com/profiles/76561198103635351/"),
            Some(ProfileRef::SteamId("76561198103635351".to_string()))
        );
    }

    #[test]
    fn test_parse_vanity_url() {
        assert_eq!(
            parse_profile_url("https://steamcommunity.com/id/gabe/"),
            Some(ProfileRef::Vanity("gabe".to_string()))
        );
        assert_eq!(
            parse_profile_url("gabe"),
            Some(ProfileRef::Vanity("gabe".to_string()))
        );
    }

    #[test]
    fn test_parse_bare_steam_id() {
        assert_eq!(
            parse_profile_url(" 76561198000000001 "),
            Some(ProfileRef::SteamId("76561198000000001".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_other_input() {
        assert_eq!(parse_profile_url(""), None);
        assert_eq!(parse_profile_url("   "), None);
        assert_eq!(parse_profile_url("https://example.com/id/gabe"), None);
        assert_eq!(parse_profile_url("https://steamcommunity.com/id/"), None);
        assert_eq!(parse_profile_url("two words"), None);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = SteamClient::new("secret-key");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains(STEAM_API_ROOT));
    }
}
