//! Synchronisation with Steam - Linking accounts and refreshing libraries.
//!
//! These are the only core functions that talk to the Steam client. They
//! combine a fetch with the matching persistence call and report what changed.

use crate::{
    core::{catalog, ownership, user},
    errors::Result,
    steam::SteamClient,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

/// Outcome of `/steam set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The account was linked and its library recorded
    Linked {
        /// Ownership rows inserted from the Steam library
        games_synced: u64,
    },
    /// The input was neither a Steam64 ID nor a resolvable profile
    Unresolved,
    /// Steam does not know this account
    InvalidAccount,
    /// Another Discord member already linked this Steam account
    AlreadyClaimed,
}

/// What a catalog refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Apps returned by `GetAppList`
    pub apps_fetched: usize,
    /// Apps new to the catalog
    pub apps_inserted: u64,
    /// Linked users whose libraries were fetched
    pub users_synced: usize,
    /// Ownership rows added across all users
    pub ownership_inserted: u64,
    /// When the refresh completed
    pub finished_at: DateTime<Utc>,
}

/// Links a Discord member to the Steam account named by `input` and records
/// the account's library.
///
/// A relink replaces the previous account's Steam-sourced games; custom-game
/// registrations are kept.
#[instrument(skip(db, steam))]
pub async fn link_steam_account(
    db: &DatabaseConnection,
    steam: &SteamClient,
    discord_id: &str,
    input: &str,
) -> Result<LinkOutcome> {
    let Some(steam_id) = steam.resolve_vanity_url(input).await else {
        return Ok(LinkOutcome::Unresolved);
    };
    if !steam.is_valid_id(&steam_id).await {
        return Ok(LinkOutcome::InvalidAccount);
    }
    if !user::upsert_steam_id(db, discord_id, &steam_id).await? {
        return Ok(LinkOutcome::AlreadyClaimed);
    }

    if let Some(linked) = user::get_user_by_discord_id(db, discord_id).await? {
        ownership::clear_steam_ownership(db, linked.id).await?;
    }
    let games_synced = sync_owned_games(db, steam, &steam_id).await?;

    info!(discord_id, steam_id = %steam_id, games_synced, "Linked Steam account");
    Ok(LinkOutcome::Linked { games_synced })
}

/// Fetches a Steam library and records any games not yet linked to its owner.
///
/// Additive only: an empty fetch (private profile or Steam outage) removes
/// nothing.
pub async fn sync_owned_games(
    db: &DatabaseConnection,
    steam: &SteamClient,
    steam_id: &str,
) -> Result<u64> {
    let app_ids = steam.fetch_owned_game_ids(steam_id).await;
    if app_ids.is_empty() {
        return Ok(0);
    }
    ownership::record_owned_games(db, &app_ids, steam_id).await
}

/// Merges the latest Steam app list into the catalog, then re-syncs every
/// linked user's library.
///
/// One user's failure is logged and skipped so the rest still sync.
#[instrument(skip(db, steam))]
pub async fn refresh_catalog(db: &DatabaseConnection, steam: &SteamClient) -> Result<RefreshSummary> {
    let apps = steam.fetch_app_catalog().await;
    let apps_fetched = apps.len();
    let apps_inserted = if apps.is_empty() {
        warn!("Steam app list was empty; catalog left unchanged");
        0
    } else {
        catalog::merge_app_catalog(db, &apps).await?
    };

    let mut users_synced = 0;
    let mut ownership_inserted = 0;
    for linked in user::users_with_steam_ids(db).await? {
        let Some(steam_id) = linked.steam_id.as_deref() else {
            continue;
        };
        match sync_owned_games(db, steam, steam_id).await {
            Ok(inserted) => {
                users_synced += 1;
                ownership_inserted += inserted;
            }
            Err(e) => warn!(discord_id = %linked.discord_id, error = %e, "Library sync failed"),
        }
    }

    let summary = RefreshSummary {
        apps_fetched,
        apps_inserted,
        users_synced,
        ownership_inserted,
        finished_at: Utc::now(),
    };
    info!(
        apps_fetched,
        apps_inserted, users_synced, ownership_inserted, "Catalog refresh finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::database::{Table, row_count};
    use crate::test_utils::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ALICE: &str = "100";
    const ALICE_STEAM: &str = "76561198000000100";
    const BOB: &str = "200";

    async fn mount_player(server: &MockServer, steam_id: &str) {
        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerSummaries/v0002/"))
            .and(query_param("steamids", steam_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": { "players": [{ "steamid": steam_id }] }
            })))
            .mount(server)
            .await;
    }

    async fn mount_library(server: &MockServer, steam_id: &str, app_ids: &[u32]) {
        let games: Vec<_> = app_ids.iter().map(|id| json!({ "appid": id })).collect();
        Mock::given(method("GET"))
            .and(path("/IPlayerService/GetOwnedGames/v0001/"))
            .and(query_param("steamid", steam_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": { "games": games }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_link_records_library() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(70, "Half-Life"), (400, "Portal")]).await?;
        let server = MockServer::start().await;
        let steam = SteamClient::with_api_root("key", server.uri());
        mount_player(&server, ALICE_STEAM).await;
        mount_library(&server, ALICE_STEAM, &[70, 400, 999]).await;

        let outcome = link_steam_account(&db, &steam, ALICE, ALICE_STEAM).await?;
        assert_eq!(outcome, LinkOutcome::Linked { games_synced: 2 });
        assert_eq!(ownership::games_of(&db, ALICE).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_link_rejects_unknown_account() -> Result<()> {
        let db = setup_test_db().await?;
        let server = MockServer::start().await;
        let steam = SteamClient::with_api_root("key", server.uri());
        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerSummaries/v0002/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": { "players": [] }
            })))
            .mount(&server)
            .await;

        let outcome = link_steam_account(&db, &steam, ALICE, "123").await?;
        assert_eq!(outcome, LinkOutcome::InvalidAccount);
        assert_eq!(row_count(&db, Table::Users).await?, 0);

        let outcome = link_steam_account(&db, &steam, ALICE, "https://example.com/x").await?;
        assert_eq!(outcome, LinkOutcome::Unresolved);
        Ok(())
    }

    #[tokio::test]
    async fn test_link_already_claimed() -> Result<()> {
        let db = setup_test_db().await?;
        let server = MockServer::start().await;
        let steam = SteamClient::with_api_root("key", server.uri());
        mount_player(&server, ALICE_STEAM).await;
        mount_library(&server, ALICE_STEAM, &[]).await;

        assert!(matches!(
            link_steam_account(&db, &steam, ALICE, ALICE_STEAM).await?,
            LinkOutcome::Linked { .. }
        ));
        assert_eq!(
            link_steam_account(&db, &steam, BOB, ALICE_STEAM).await?,
            LinkOutcome::AlreadyClaimed
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_relink_replaces_steam_games_and_keeps_custom() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(70, "Half-Life"), (400, "Portal")]).await?;
        let cricket = create_custom_game(&db, "Backyard Cricket").await?;
        let server = MockServer::start().await;
        let steam = SteamClient::with_api_root("key", server.uri());
        let second = "76561198000000101";
        mount_player(&server, ALICE_STEAM).await;
        mount_player(&server, second).await;
        mount_library(&server, ALICE_STEAM, &[70]).await;
        mount_library(&server, second, &[400]).await;

        link_steam_account(&db, &steam, ALICE, ALICE_STEAM).await?;
        ownership::register_game(&db, ALICE, cricket.id).await?;
        link_steam_account(&db, &steam, ALICE, second).await?;

        let titles: Vec<String> = ownership::games_of(&db, ALICE)
            .await?
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(titles, vec!["Backyard Cricket", "Portal"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_catalog_merges_and_resyncs() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(70, "Half-Life")]).await?;
        create_test_user(&db, ALICE, Some(ALICE_STEAM)).await?;
        create_test_user(&db, BOB, None).await?;

        let server = MockServer::start().await;
        let steam = SteamClient::with_api_root("key", server.uri());
        Mock::given(method("GET"))
            .and(path("/ISteamApps/GetAppList/v2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "applist": { "apps": [
                    { "appid": 70, "name": "Half-Life" },
                    { "appid": 400, "name": "Portal" }
                ] }
            })))
            .mount(&server)
            .await;
        mount_library(&server, ALICE_STEAM, &[70, 400]).await;

        let summary = refresh_catalog(&db, &steam).await?;
        assert_eq!(summary.apps_fetched, 2);
        assert_eq!(summary.apps_inserted, 1);
        assert_eq!(summary.users_synced, 1);
        assert_eq!(summary.ownership_inserted, 2);

        // A second run finds nothing new
        let again = refresh_catalog(&db, &steam).await?;
        assert_eq!(again.apps_inserted, 0);
        assert_eq!(again.ownership_inserted, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_survives_steam_outage() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(70, "Half-Life")]).await?;
        create_test_user(&db, ALICE, Some(ALICE_STEAM)).await?;
        ownership::record_owned_games(&db, &[70], ALICE_STEAM).await?;

        let steam = SteamClient::with_api_root("key", "http://127.0.0.1:1");
        let summary = refresh_catalog(&db, &steam).await?;

        assert_eq!(summary.apps_fetched, 0);
        assert_eq!(summary.ownership_inserted, 0);
        assert_eq!(row_count(&db, Table::Games).await?, 1);
        assert_eq!(row_count(&db, Table::OwnedGames).await?, 1);
        Ok(())
    }
}
