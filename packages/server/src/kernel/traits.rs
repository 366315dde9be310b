// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The expiration sweep lives in domains::listings::lifecycle and talks to
// Postgres and the email service only through these seams.
//
// Naming convention: Base* for trait names (e.g., BaseListingStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::ListingId;
use crate::domains::listings::models::ExpiredListing;

// =============================================================================
// Listing Store Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseListingStore: Send + Sync {
    /// Live listings (status unset, `active` or `approved`) with `end_date < now`,
    /// joined with the host's name and email.
    async fn fetch_live_expired(&self, now: DateTime<Utc>) -> Result<Vec<ExpiredListing>>;

    /// Set every listing matching the same predicate to `inactive` in one
    /// bulk write. The predicate is re-evaluated at call time.
    /// Returns the ids that were retired; its length is the affected row count.
    async fn retire_live_expired(&self, now: DateTime<Utc>) -> Result<Vec<ListingId>>;

    /// Host-joined rows for the given listings, regardless of status
    async fn fetch_expired_by_ids(&self, ids: &[ListingId]) -> Result<Vec<ExpiredListing>>;
}

// =============================================================================
// Listing Notifier Trait (Infrastructure - host email)
// =============================================================================

#[async_trait]
pub trait BaseListingNotifier: Send + Sync {
    /// Tell a host their listing expired. `Err` means the attempt failed;
    /// callers record it and move on.
    async fn notify_expired(
        &self,
        host_email: &str,
        host_name: &str,
        listing: &ExpiredListing,
    ) -> Result<()>;
}
