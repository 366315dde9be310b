//! Listing expiration lifecycle.
//!
//! A listing is live while its status is unset, `active` or `approved`.
//! Once its `end_date` has passed, the next sweep retires it (`inactive`)
//! and emails the host. Retired listings are never touched again here.
//!
//! ```text
//! JobScheduler (top of every hour) ──┐
//! start() (once, immediately) ───────┼─► sweep()
//! manual_trigger() (admin) ──────────┘     ├─► fetch_live_expired(now)   snapshot
//!                                          ├─► retire_live_expired(now)  UPDATE ... RETURNING id
//!                                          └─► notify_expired() per listing, one task each
//! ```
//!
//! Hosts are notified for every listing in the snapshot and for every
//! listing the bulk write retired that the snapshot missed (it expired
//! between the two statements), so each retirement is announced at least once.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, warn};

use crate::common::ListingId;
use crate::config::DEFAULT_EXPIRATION_CRON;
use crate::domains::listings::models::ExpiredListing;
use crate::kernel::{BaseListingNotifier, BaseListingStore};

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Listing expiration is already scheduled for this manager")]
    AlreadyStarted,

    #[error("Invalid expiration schedule '{cron}': {reason}")]
    Schedule { cron: String, reason: String },

    #[error("Listing store error: {0:#}")]
    Store(#[source] anyhow::Error),
}

/// When scheduled sweeps fire.
#[derive(Debug, Clone)]
pub struct ExpirationSchedule {
    /// Six-field cron expression (with seconds)
    pub cron: String,
    /// Sweep once right away instead of waiting for the first tick
    pub run_on_startup: bool,
}

impl Default for ExpirationSchedule {
    fn default() -> Self {
        Self {
            cron: DEFAULT_EXPIRATION_CRON.to_string(),
            run_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationResult {
    Delivered,
    Failed { reason: String },
}

/// One notification attempt, kept for logs and the admin response.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationOutcome {
    pub listing_id: ListingId,
    pub host_email: String,
    #[serde(flatten)]
    pub result: NotificationResult,
}

impl NotificationOutcome {
    pub fn is_delivered(&self) -> bool {
        self.result == NotificationResult::Delivered
    }
}

/// What a single sweep did.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub swept_at: DateTime<Utc>,
    /// Listings this sweep moved to `inactive`
    pub retired: Vec<ListingId>,
    pub notifications: Vec<NotificationOutcome>,
}

impl SweepReport {
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    pub fn delivered_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.is_delivered())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.notifications.len() - self.delivered_count()
    }
}

/// Retires expired listings on a schedule and tells their hosts.
///
/// Cheap to clone; clones share collaborators and the started flag, so a
/// manager (and any of its clones) can be scheduled at most once.
#[derive(Clone)]
pub struct ListingLifecycleManager {
    store: Arc<dyn BaseListingStore>,
    notifier: Arc<dyn BaseListingNotifier>,
    schedule: ExpirationSchedule,
    started: Arc<AtomicBool>,
}

impl ListingLifecycleManager {
    pub fn new(
        store: Arc<dyn BaseListingStore>,
        notifier: Arc<dyn BaseListingNotifier>,
        schedule: ExpirationSchedule,
    ) -> Self {
        Self {
            store,
            notifier,
            schedule,
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn schedule(&self) -> &ExpirationSchedule {
        &self.schedule
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Register the recurring sweep on `scheduler` and kick off one sweep now.
    ///
    /// The startup sweep runs on its own task; its handle is returned so
    /// callers may await it, but nothing requires them to. Errors from
    /// scheduled and startup sweeps are logged, never returned.
    pub async fn start(
        &self,
        scheduler: &JobScheduler,
    ) -> Result<Option<JoinHandle<()>>, LifecycleError> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Listing expiration start() called more than once; ignoring");
            return Err(LifecycleError::AlreadyStarted);
        }

        if let Err(e) = self.register(scheduler).await {
            // Nothing was scheduled, allow another attempt
            self.started.store(false, Ordering::SeqCst);
            return Err(e);
        }

        info!(
            cron = %self.schedule.cron,
            run_on_startup = self.schedule.run_on_startup,
            "Listing expiration scheduled"
        );

        let startup = self.schedule.run_on_startup.then(|| {
            let manager = self.clone();
            tokio::spawn(async move { manager.run_logged("startup").await })
        });

        Ok(startup)
    }

    async fn register(&self, scheduler: &JobScheduler) -> Result<(), LifecycleError> {
        let schedule_error = |reason: String| LifecycleError::Schedule {
            cron: self.schedule.cron.clone(),
            reason,
        };

        let manager = self.clone();
        let job = Job::new_async(self.schedule.cron.as_str(), move |_uuid, _lock| {
            let manager = manager.clone();
            Box::pin(async move { manager.run_logged("scheduled").await })
        })
        .map_err(|e| schedule_error(e.to_string()))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| schedule_error(e.to_string()))?;

        Ok(())
    }

    /// Run one sweep on behalf of an operator or a test and wait for it.
    ///
    /// Store failures are returned; notification failures only show up in
    /// the report.
    pub async fn manual_trigger(&self) -> Result<SweepReport, LifecycleError> {
        info!("Manual listing expiration triggered");
        self.sweep().await
    }

    pub async fn sweep(&self) -> Result<SweepReport, LifecycleError> {
        self.sweep_at(Utc::now()).await
    }

    /// Retire every live listing with `end_date < now` and notify hosts.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepReport, LifecycleError> {
        let snapshot = self
            .store
            .fetch_live_expired(now)
            .await
            .map_err(LifecycleError::Store)?;

        let retired = self
            .store
            .retire_live_expired(now)
            .await
            .map_err(LifecycleError::Store)?;

        if !retired.is_empty() {
            info!(count = retired.len(), "Expired listings retired");
        }

        let mut to_notify = snapshot;
        let seen: HashSet<ListingId> = to_notify.iter().map(|row| row.listing.id).collect();
        let missed: Vec<ListingId> = retired
            .iter()
            .copied()
            .filter(|id| !seen.contains(id))
            .collect();

        if !missed.is_empty() {
            debug!(count = missed.len(), "Listings expired after snapshot read");
            match self.store.fetch_expired_by_ids(&missed).await {
                Ok(rows) => to_notify.extend(rows),
                // Retirement already committed; these hosts just miss the email
                Err(e) => {
                    let error = format!("{:#}", e);
                    warn!(
                        count = missed.len(),
                        error = %error,
                        "Failed to load late-expired listings for notification"
                    );
                }
            }
        }

        let notifications = self.notify_all(to_notify).await;

        Ok(SweepReport {
            swept_at: now,
            retired,
            notifications,
        })
    }

    /// One detached task per host; every attempt runs to completion.
    async fn notify_all(&self, listings: Vec<ExpiredListing>) -> Vec<NotificationOutcome> {
        let targets: Vec<(ListingId, String)> = listings
            .iter()
            .map(|row| (row.listing.id, row.host_email.clone()))
            .collect();

        let tasks = listings.into_iter().map(|row| {
            let notifier = self.notifier.clone();
            tokio::spawn(async move {
                notifier
                    .notify_expired(&row.host_email, &row.host_name, &row)
                    .await
            })
        });

        let results = join_all(tasks).await;

        targets
            .into_iter()
            .zip(results)
            .map(|((listing_id, host_email), joined)| {
                let result = match joined {
                    Ok(Ok(())) => NotificationResult::Delivered,
                    Ok(Err(e)) => NotificationResult::Failed {
                        reason: format!("{:#}", e),
                    },
                    Err(e) => NotificationResult::Failed {
                        reason: format!("notification task aborted: {}", e),
                    },
                };

                if let NotificationResult::Failed { reason } = &result {
                    error!(
                        listing_id = %listing_id,
                        host_email = %host_email,
                        reason = %reason,
                        "Failed to send listing expiration email"
                    );
                }

                NotificationOutcome {
                    listing_id,
                    host_email,
                    result,
                }
            })
            .collect()
    }

    async fn run_logged(&self, trigger: &'static str) {
        match self.sweep().await {
            Ok(report) => debug!(
                trigger,
                retired = report.retired_count(),
                notified = report.delivered_count(),
                failed = report.failed_count(),
                "Listing expiration sweep finished"
            ),
            Err(e) => error!(trigger, error = %e, "Error expiring listings"),
        }
    }
}
