//! Background catalog refresh on a cron schedule.

use crate::{core::sync, errors::Result, steam::SteamClient};
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, instrument};

/// Schedules [`sync::refresh_catalog`] on `cron` (six fields, seconds first)
/// and starts the scheduler.
///
/// The returned scheduler must be kept alive for the job to keep firing.
#[instrument(skip(db, steam))]
pub async fn start_scheduler(
    db: DatabaseConnection,
    steam: SteamClient,
    cron: &str,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let db = db.clone();
        let steam = steam.clone();
        Box::pin(async move {
            match sync::refresh_catalog(&db, &steam).await {
                Ok(summary) => info!(
                    apps_inserted = summary.apps_inserted,
                    ownership_inserted = summary.ownership_inserted,
                    "Scheduled catalog refresh completed"
                ),
                Err(e) => error!("Scheduled catalog refresh failed: {e}"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("Catalog refresh scheduled");
    Ok(scheduler)
}
