//! Database configuration module.
//!
//! This module handles the `SQLite` connection and schema creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The autocomplete triggers and the lowercase-title index have no
//! entity representation and are issued as raw SQL.
//!
//! Every operation here treats a `DatabaseConnection::Disconnected` handle as a
//! closed connection and returns a falsy result without touching `SQLite`.

use crate::entities::{Game, GameAutocomplete, OwnedGame, User};
use crate::errors::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    Schema,
};
use std::time::Duration;
use tracing::{debug, info, instrument};

const TRIGGERS_SQL: &str = "
CREATE TRIGGER IF NOT EXISTS trg_owned_games_insert_autocomplete
AFTER INSERT ON tb_owned_games
BEGIN
    INSERT OR IGNORE INTO tb_games_autocomplete (game_id, title)
    SELECT id, title FROM tb_games WHERE id = NEW.game_id;
END;

CREATE TRIGGER IF NOT EXISTS trg_owned_games_delete_autocomplete
AFTER DELETE ON tb_owned_games
WHEN NOT EXISTS (SELECT 1 FROM tb_owned_games WHERE game_id = OLD.game_id)
BEGIN
    DELETE FROM tb_games_autocomplete WHERE game_id = OLD.game_id;
END;
";

const INDEXES_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_games_title_lower ON tb_games (title_lower);";

/// Tables whose sizes can be reported by [`row_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// `tb_users`
    Users,
    /// `tb_games`
    Games,
    /// `tb_owned_games`
    OwnedGames,
    /// `tb_games_autocomplete`
    GamesAutocomplete,
}

impl Table {
    /// The `SQLite` table name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "tb_users",
            Self::Games => "tb_games",
            Self::OwnedGames => "tb_owned_games",
            Self::GamesAutocomplete => "tb_games_autocomplete",
        }
    }
}

/// Returns `false` for a handle that was never connected or has been closed.
#[must_use]
pub const fn is_open(db: &DatabaseConnection) -> bool {
    !matches!(db, DatabaseConnection::Disconnected)
}

/// Opens the database named by `database_url` and ensures the schema exists.
///
/// In-memory URLs are limited to a single pooled connection so every query
/// sees the same database.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    debug!("Opening database connection");
    let db = Database::connect(options).await?;

    create_tables(&db).await?;
    create_triggers(&db).await?;
    info!("Database ready");
    Ok(db)
}

/// Creates every table if it does not exist yet.
///
/// Returns `Ok(false)` when the connection is not open.
pub async fn create_tables(db: &DatabaseConnection) -> Result<bool> {
    if !is_open(db) {
        return Ok(false);
    }

    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children so the foreign keys resolve
    let tables = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Game),
        schema.create_table_from_entity(OwnedGame),
        schema.create_table_from_entity(GameAutocomplete),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }
    db.execute_unprepared(INDEXES_SQL).await?;

    Ok(true)
}

/// Creates the triggers that keep `tb_games_autocomplete` in step with
/// `tb_owned_games`.
///
/// Returns `Ok(false)` when the connection is not open.
pub async fn create_triggers(db: &DatabaseConnection) -> Result<bool> {
    if !is_open(db) {
        return Ok(false);
    }

    db.execute_unprepared(TRIGGERS_SQL).await?;
    Ok(true)
}

/// Counts the rows of a table. Returns `Ok(0)` when the connection is not open.
pub async fn row_count(db: &DatabaseConnection, table: Table) -> Result<u64> {
    if !is_open(db) {
        return Ok(0);
    }

    let count = match table {
        Table::Users => User::find().count(db).await?,
        Table::Games => Game::find().count(db).await?,
        Table::OwnedGames => OwnedGame::find().count(db).await?,
        Table::GamesAutocomplete => GameAutocomplete::find().count(db).await?,
    };
    Ok(count)
}
