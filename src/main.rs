use dotenvy::dotenv;
use lobby_locator::{
    bot::{self, BotData},
    config::{AppConfig, database},
    core::sync,
    errors::Result,
    scheduler,
    steam::SteamClient,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the real environment
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = AppConfig::from_env()
        .inspect_err(|e| error!("Critical error loading application configuration: {e}"))?;

    // 4. Initialize database
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    let steam = SteamClient::new(app_config.steam_api_key.clone());

    // 5. Schedule the catalog refresh and run one now in the background
    let _scheduler =
        scheduler::start_scheduler(db.clone(), steam.clone(), &app_config.refresh_cron).await?;
    {
        let db = db.clone();
        let steam = steam.clone();
        tokio::spawn(async move {
            if let Err(e) = sync::refresh_catalog(&db, &steam).await {
                error!("Initial catalog refresh failed: {e}");
            }
        });
    }

    // 6. Run the bot
    bot::run_bot(BotData::new(db, steam, app_config)).await
}
