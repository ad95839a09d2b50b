//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The refresh loop runs on a cron schedule and asks the engine to
//! sync every active stream. The engine's own refresh windows decide
//! per connection whether anything is actually fetched, so running the
//! loop more often than the smallest window is harmless.
//!
//! ```text
//! Scheduler (every 15 minutes)
//!     │
//!     └─► engine.sync_all_streams()
//!             └─► For each active stream → run_sync (one task per stream)
//!                     └─► CHECK_DUE → FETCH → NORMALIZE → ANNOTATE → UPSERT
//! ```

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use activity_stream::SyncEngine;

/// Start the background refresh loop
pub async fn start_scheduler(engine: Arc<SyncEngine>, cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let refresh_engine = engine.clone();
    let refresh_job = Job::new_async(cron, move |_uuid, _lock| {
        let engine = refresh_engine.clone();
        Box::pin(async move {
            if let Err(e) = engine.sync_all_streams().await {
                tracing::error!("Refresh cycle failed: {}", e);
            }
        })
    })?;

    scheduler.add(refresh_job).await?;
    scheduler.start().await?;

    tracing::info!(cron, "Scheduled tasks started (stream refresh loop)");
    Ok(scheduler)
}
