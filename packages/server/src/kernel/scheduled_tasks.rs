//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Currently a single task: the listing expiration sweep, hourly at the top
//! of the hour by default, plus one sweep at startup.
//!
//! ```text
//! Scheduler (EXPIRATION_CRON)
//!     │
//!     └─► ListingLifecycleManager::sweep()
//!             ├─► retire live listings past end_date
//!             └─► email each host
//! ```

use anyhow::{Context, Result};
use tokio_cron_scheduler::JobScheduler;

use crate::domains::listings::{ExpirationSchedule, ListingLifecycleManager};
use crate::kernel::ServerDeps;

/// Start all scheduled tasks.
///
/// The returned scheduler must be kept alive (and shut down on exit);
/// the manager is shared with the admin routes for manual sweeps.
pub async fn start_scheduler(
    deps: &ServerDeps,
    schedule: ExpirationSchedule,
) -> Result<(JobScheduler, ListingLifecycleManager)> {
    let scheduler = JobScheduler::new().await?;

    let lifecycle = ListingLifecycleManager::new(
        deps.listing_store.clone(),
        deps.listing_notifier.clone(),
        schedule,
    );

    // Startup sweep runs detached; failures are logged by the manager
    let _startup = lifecycle
        .start(&scheduler)
        .await
        .context("Failed to schedule listing expiration")?;

    scheduler.start().await?;

    tracing::info!(
        cron = %lifecycle.schedule().cron,
        "Scheduled tasks started (listing expiration)"
    );
    Ok((scheduler, lifecycle))
}
