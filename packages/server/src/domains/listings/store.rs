//! Postgres-backed listing store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::ListingId;
use crate::domains::listings::models::{ExpiredListing, Listing};
use crate::kernel::BaseListingStore;

#[derive(Clone)]
pub struct PostgresListingStore {
    pool: PgPool,
}

impl PostgresListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseListingStore for PostgresListingStore {
    async fn fetch_live_expired(&self, now: DateTime<Utc>) -> Result<Vec<ExpiredListing>> {
        Listing::find_live_expired(now, &self.pool)
            .await
            .context("Failed to load expired listings")
    }

    async fn retire_live_expired(&self, now: DateTime<Utc>) -> Result<Vec<ListingId>> {
        Listing::retire_live_expired(now, &self.pool)
            .await
            .context("Failed to retire expired listings")
    }

    async fn fetch_expired_by_ids(&self, ids: &[ListingId]) -> Result<Vec<ExpiredListing>> {
        Listing::find_expired_by_ids(ids, &self.pool)
            .await
            .context("Failed to load retired listings")
    }
}
