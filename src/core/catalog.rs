//! Catalog business logic - The merged set of Steam and custom game titles.
//!
//! Steam titles are bulk-merged from `GetAppList` and never overwritten; custom
//! titles are added and removed one at a time by administrators. Titles are
//! unique across both sources, so whichever arrives first keeps the name.

use crate::{
    config::database::is_open,
    core::matching::{self, TitleMatch},
    entities::{Game, game},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, QuerySelect, Set, Statement, TransactionTrait, Value, prelude::*,
    sea_query::LikeExpr,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Rows per `INSERT` statement; three bound values each keeps well under
/// `SQLite`'s variable limit.
const MERGE_BATCH_SIZE: usize = 300;

/// Outcome of adding a custom game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new custom game was created
    Added(game::Model),
    /// A game (Steam or custom) with this exact title is already in the catalog
    AlreadyExists(game::Model),
}

/// Outcome of removing a custom game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The custom game and its registrations were deleted
    Removed(game::Model),
    /// The title belongs to the Steam catalog and is not admin-managed
    SteamGame(game::Model),
    /// No game has this title
    NotFound,
}

/// Inserts every `(app id, title)` pair that is not already present.
///
/// Existing app ids and existing titles are skipped, so merging the same
/// catalog twice inserts nothing the second time. Blank titles are dropped.
///
/// Returns the number of rows inserted, or `0` if the connection is not open.
pub async fn merge_app_catalog(
    db: &DatabaseConnection,
    apps: &BTreeMap<u32, String>,
) -> Result<u64> {
    if !is_open(db) {
        return Ok(0);
    }

    let rows: Vec<(u32, &str)> = apps
        .iter()
        .map(|(id, title)| (*id, title.trim()))
        .filter(|(_, title)| !title.is_empty())
        .collect();
    if rows.is_empty() {
        return Ok(0);
    }

    let txn = db.begin().await?;
    let backend = txn.get_database_backend();
    let mut inserted = 0;

    for batch in rows.chunks(MERGE_BATCH_SIZE) {
        let placeholders = vec!["(?, ?, ?)"; batch.len()].join(", ");
        let sql = format!(
            "INSERT OR IGNORE INTO tb_games (steam_app_id, title, title_lower) VALUES {placeholders}"
        );
        let values: Vec<Value> = batch
            .iter()
            .flat_map(|(id, title)| {
                [
                    Value::from(i64::from(*id)),
                    Value::from(*title),
                    Value::from(title.to_lowercase()),
                ]
            })
            .collect();

        let result = txn
            .execute(Statement::from_sql_and_values(backend, sql, values))
            .await?;
        inserted += result.rows_affected();
    }

    txn.commit().await?;
    info!(
        offered = rows.len(),
        inserted, "Merged Steam app catalog"
    );
    Ok(inserted)
}

/// Finds a game by title, ignoring case.
pub async fn find_game_by_title(
    db: &DatabaseConnection,
    title: &str,
) -> Result<Option<game::Model>> {
    if !is_open(db) {
        return Ok(None);
    }

    Game::find()
        .filter(game::Column::TitleLower.eq(title.trim().to_lowercase()))
        .order_by_asc(game::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a game by its title exactly as stored, case included.
///
/// Steam titles may differ only in case ("Portal" and "PORTAL" are separate
/// apps), so a title picked from a list must be looked up this way.
pub async fn find_game_by_exact_title(
    db: &DatabaseConnection,
    title: &str,
) -> Result<Option<game::Model>> {
    if !is_open(db) {
        return Ok(None);
    }

    Game::find()
        .filter(game::Column::Title.eq(title.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Exact-case match first, then the first title equal ignoring case.
async fn find_game_preferring_case(
    db: &DatabaseConnection,
    title: &str,
) -> Result<Option<game::Model>> {
    match find_game_by_exact_title(db, title).await? {
        Some(game) => Ok(Some(game)),
        None => find_game_by_title(db, title).await,
    }
}

/// Builds a `LIKE` substring pattern for `partial` with `%` and `_` treated
/// as literal characters (backslash is the escape character).
#[must_use]
pub fn contains_pattern(partial: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(partial.len() + 2);
    pattern.push('%');
    for c in partial.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

/// Adds an administrator-curated game with no Steam app id.
///
/// Adding a title that already exists (in any case) is not an error; the
/// existing game is returned instead.
pub async fn add_custom_game(db: &DatabaseConnection, title: &str) -> Result<AddOutcome> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput {
            message: "Game title cannot be empty".to_string(),
        });
    }

    if let Some(existing) = find_game_by_title(db, title).await? {
        return Ok(AddOutcome::AlreadyExists(existing));
    }

    let model = game::ActiveModel {
        steam_app_id: Set(None),
        title: Set(title.to_string()),
        title_lower: Set(title.to_lowercase()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!(title, "Added custom game");
    Ok(AddOutcome::Added(created))
}

/// Removes a custom game. Registrations and the autocomplete row are removed
/// by the foreign key cascade.
pub async fn remove_custom_game(db: &DatabaseConnection, title: &str) -> Result<RemoveOutcome> {
    let Some(existing) = find_game_preferring_case(db, title).await? else {
        return Ok(RemoveOutcome::NotFound);
    };

    if !existing.is_custom() {
        return Ok(RemoveOutcome::SteamGame(existing));
    }

    Game::delete_by_id(existing.id).exec(db).await?;
    debug!(title = %existing.title, "Removed custom game");
    Ok(RemoveOutcome::Removed(existing))
}

/// Every title in the catalog.
pub async fn all_titles(db: &DatabaseConnection) -> Result<Vec<String>> {
    if !is_open(db) {
        return Ok(Vec::new());
    }

    Game::find()
        .select_only()
        .column(game::Column::Title)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Titles containing `partial` (case-insensitive), shortest first, for
/// autocomplete.
pub async fn search_catalog_titles(
    db: &DatabaseConnection,
    partial: &str,
    custom_only: bool,
    limit: u64,
) -> Result<Vec<String>> {
    if !is_open(db) {
        return Ok(Vec::new());
    }

    let mut query = Game::find()
        .select_only()
        .column(game::Column::Title)
        .filter(game::Column::TitleLower.like(contains_pattern(&partial.trim().to_lowercase())));
    if custom_only {
        query = query.filter(game::Column::SteamAppId.is_null());
    }

    query
        .order_by_asc(Expr::cust("length(title)"))
        .order_by_asc(game::Column::Title)
        .limit(limit)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolves user input against the whole catalog.
///
/// An exact hit (same case first, then ignoring case) is answered from the
/// indexed columns; only a miss pays for the fuzzy scan.
pub async fn resolve_in_catalog(db: &DatabaseConnection, input: &str) -> Result<TitleMatch> {
    if let Some(game) = find_game_preferring_case(db, input).await? {
        return Ok(TitleMatch::Exact(game.title));
    }

    let titles = all_titles(db).await?;
    Ok(matching::resolve_title(input, titles.iter().map(String::as_str)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::database::{Table, row_count};
    use crate::test_utils::*;

    fn catalog(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
        pairs
            .iter()
            .map(|(id, title)| (*id, (*title).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_merge_inserts_all_new_apps() -> Result<()> {
        let db = setup_test_db().await?;

        let inserted =
            merge_app_catalog(&db, &catalog(&[(1, "app_1"), (2, "app_2"), (3, "app_3")])).await?;
        assert_eq!(inserted, 3);
        assert_eq!(row_count(&db, Table::Games).await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_merge_empty_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(merge_app_catalog(&db, &BTreeMap::new()).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_merge_is_duplicate_safe() -> Result<()> {
        let db = setup_test_db().await?;

        assert_eq!(merge_app_catalog(&db, &catalog(&[(1, "Half-Life")])).await?, 1);
        assert_eq!(merge_app_catalog(&db, &catalog(&[(1, "Half-Life")])).await?, 0);

        let inserted =
            merge_app_catalog(&db, &catalog(&[(1, "Half-Life"), (2, "Portal")])).await?;
        assert_eq!(inserted, 1);
        assert_eq!(row_count(&db, Table::Games).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_merge_skips_blank_and_duplicate_titles() -> Result<()> {
        let db = setup_test_db().await?;
        add_custom_game(&db, "Portal").await?;

        let inserted = merge_app_catalog(
            &db,
            &catalog(&[(1, ""), (2, "   "), (3, "Portal"), (4, "Portal 2")]),
        )
        .await?;
        assert_eq!(inserted, 1);

        // The custom entry keeps the title
        let portal = find_game_by_title(&db, "Portal").await?.unwrap();
        assert!(portal.is_custom());
        Ok(())
    }

    #[tokio::test]
    async fn test_merge_spans_multiple_batches() -> Result<()> {
        let db = setup_test_db().await?;

        let big: BTreeMap<u32, String> = (1..=750).map(|id| (id, format!("App {id}"))).collect();
        assert_eq!(merge_app_catalog(&db, &big).await?, 750);
        assert_eq!(merge_app_catalog(&db, &big).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_merge_on_closed_connection_returns_zero() -> Result<()> {
        let db = DatabaseConnection::Disconnected;
        assert_eq!(merge_app_catalog(&db, &catalog(&[(1, "app_1")])).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_game_by_title_ignores_case() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(70, "Half-Life")]).await?;

        let game = find_game_by_title(&db, "half-LIFE").await?.unwrap();
        assert_eq!(game.title, "Half-Life");
        assert_eq!(game.steam_app_id, Some(70));
        assert!(find_game_by_title(&db, "Half-Life 3").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_custom_game_twice_is_a_no_op() -> Result<()> {
        let db = setup_test_db().await?;

        let first = add_custom_game(&db, "Lethal Company LAN").await?;
        assert!(matches!(first, AddOutcome::Added(ref g) if g.is_custom()));

        let second = add_custom_game(&db, "lethal company lan").await?;
        assert!(matches!(second, AddOutcome::AlreadyExists(ref g) if g.title == "Lethal Company LAN"));
        assert_eq!(row_count(&db, Table::Games).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_custom_game_rejects_blank_title() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(matches!(
            add_custom_game(&db, "  ").await,
            Err(Error::InvalidInput { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_custom_game() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(620, "Portal 2")]).await?;
        add_custom_game(&db, "Backyard Cricket").await?;

        assert!(matches!(
            remove_custom_game(&db, "backyard cricket").await?,
            RemoveOutcome::Removed(_)
        ));
        assert!(matches!(
            remove_custom_game(&db, "Portal 2").await?,
            RemoveOutcome::SteamGame(_)
        ));
        assert_eq!(
            remove_custom_game(&db, "Backyard Cricket").await?,
            RemoveOutcome::NotFound
        );
        assert_eq!(row_count(&db, Table::Games).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_titles() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(400, "Portal"), (620, "Portal 2"), (70, "Half-Life")]).await?;
        add_custom_game(&db, "Portal Tag").await?;

        let all = search_catalog_titles(&db, "portal", false, 25).await?;
        assert_eq!(all, vec!["Portal", "Portal 2", "Portal Tag"]);

        let custom = search_catalog_titles(&db, "PORT", true, 25).await?;
        assert_eq!(custom, vec!["Portal Tag"]);

        let limited = search_catalog_titles(&db, "", false, 2).await?;
        assert_eq!(limited.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_in_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(400, "Portal"), (620, "Portal 2"), (70, "Half-Life")]).await?;

        assert_eq!(
            resolve_in_catalog(&db, "PORTAL").await?,
            TitleMatch::Exact("Portal".to_string())
        );

        match resolve_in_catalog(&db, "Portl 2").await? {
            TitleMatch::Candidates(candidates) => {
                assert_eq!(candidates.first().map(String::as_str), Some("Portal 2"));
                assert!(candidates.len() <= matching::MAX_CANDIDATES);
            }
            other => panic!("expected candidates, got {other:?}"),
        }

        assert_eq!(
            resolve_in_catalog(&db, "Stardew Valley").await?,
            TitleMatch::NoMatch
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_titles_differing_only_in_case_stay_distinct() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(seed_catalog(&db, &[(1, "Portal"), (2, "PORTAL")]).await?, 2);

        let upper = find_game_by_exact_title(&db, "PORTAL").await?.unwrap();
        assert_eq!(upper.steam_app_id, Some(2));
        let lower = find_game_by_exact_title(&db, "Portal").await?.unwrap();
        assert_eq!(lower.steam_app_id, Some(1));
        assert!(find_game_by_exact_title(&db, "portal").await?.is_none());

        assert_eq!(
            resolve_in_catalog(&db, "PORTAL").await?,
            TitleMatch::Exact("PORTAL".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(1, "100% Orange Juice"), (2, "Snake_Pass"), (3, "SnakeXPass")]).await?;

        assert_eq!(
            search_catalog_titles(&db, "%", false, 25).await?,
            vec!["100% Orange Juice"]
        );
        assert_eq!(
            search_catalog_titles(&db, "snake_", false, 25).await?,
            vec!["Snake_Pass"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_search_ignores_case_beyond_ascii() -> Result<()> {
        let db = setup_test_db().await?;
        seed_catalog(&db, &[(1, "ÖSTERREICH SIMULATOR")]).await?;

        assert_eq!(
            search_catalog_titles(&db, "österreich", false, 25).await?,
            vec!["ÖSTERREICH SIMULATOR"]
        );
        Ok(())
    }
}
