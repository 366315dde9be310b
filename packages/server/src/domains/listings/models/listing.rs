use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ListingId, UserId};

/// Sublet listing - SQL persistence layer
///
/// Only the expiration sweep writes `status` here; hosts edit everything
/// else through the listings API.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: ListingId,
    pub user_id: UserId,

    // Content
    pub title: String,
    pub description: Option<String>,

    // Location
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,

    // Availability window
    pub price_per_night: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    pub max_occupancy: i32,

    pub status: Option<String>, // NULL, 'active', 'approved', 'inactive', 'ended'

    pub created_at: DateTime<Utc>,
}

/// A live listing past its end date, joined with the host to notify.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpiredListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub host_name: String,
    pub host_email: String,
}

/// Fields a host supplies when creating a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub price_per_night: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    pub max_occupancy: i32,
    pub status: Option<ListingStatus>,
}

impl NewListing {
    pub fn new(user_id: UserId, title: impl Into<String>, end_date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            title: title.into(),
            description: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            country: None,
            price_per_night: None,
            start_date: None,
            end_date,
            max_occupancy: 1,
            status: Some(ListingStatus::Active),
        }
    }

    pub fn with_status(mut self, status: Option<ListingStatus>) -> Self {
        self.status = status;
        self
    }
}

// =============================================================================
// Status
// =============================================================================

/// Listing status column values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Approved,
    Inactive,
    Ended,
    /// Values written by other parts of the marketplace
    #[serde(untagged)]
    Other(String),
}

impl ListingStatus {
    /// Unset, `active` and `approved` listings are bookable.
    pub fn is_live(status: Option<&ListingStatus>) -> bool {
        matches!(
            status,
            None | Some(ListingStatus::Active) | Some(ListingStatus::Approved)
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Approved => "approved",
            ListingStatus::Inactive => "inactive",
            ListingStatus::Ended => "ended",
            ListingStatus::Other(s) => s,
        }
    }
}

impl From<&str> for ListingStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => ListingStatus::Active,
            "approved" => ListingStatus::Approved,
            "inactive" => ListingStatus::Inactive,
            "ended" => ListingStatus::Ended,
            other => ListingStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a listing sits in the expiration lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Live,
    Retired,
    /// Statuses the expiration sweep never reads or writes (e.g. `ended`)
    Untracked,
}

impl LifecycleState {
    pub fn of(status: Option<&ListingStatus>) -> Self {
        match status {
            s if ListingStatus::is_live(s) => LifecycleState::Live,
            Some(ListingStatus::Inactive) => LifecycleState::Retired,
            _ => LifecycleState::Untracked,
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

impl Listing {
    pub fn status(&self) -> Option<ListingStatus> {
        self.status.as_deref().map(ListingStatus::from)
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState::of(self.status().as_ref())
    }

    /// Live and past its end date at `now`
    pub fn is_live_expired(&self, now: DateTime<Utc>) -> bool {
        self.lifecycle_state() == LifecycleState::Live && self.end_date < now
    }

    /// Find listing by ID
    pub async fn find_by_id(id: ListingId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a new listing
    pub async fn create(new: NewListing, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO listings (
                id, user_id, title, description, address, city, state, zip, country,
                price_per_night, start_date, end_date, max_occupancy, status
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING *",
        )
        .bind(ListingId::new())
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip)
        .bind(&new.country)
        .bind(new.price_per_night)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.max_occupancy)
        .bind(new.status.as_ref().map(|s| s.as_str().to_string()))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Live listings whose end date is before `now`, with host contact info
    pub async fn find_live_expired(
        now: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Vec<ExpiredListing>> {
        sqlx::query_as::<_, ExpiredListing>(
            "SELECT l.*, u.name AS host_name, u.email AS host_email
             FROM listings l
             JOIN users u ON l.user_id = u.id
             WHERE (l.status IS NULL OR l.status IN ('active', 'approved'))
               AND l.end_date < $1
             ORDER BY l.end_date",
        )
        .bind(now)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Flip every live listing past its end date to `inactive` in one statement.
    ///
    /// The predicate is evaluated at write time, so concurrent or repeated
    /// calls never retire a row twice. Returns the ids this call retired.
    pub async fn retire_live_expired(now: DateTime<Utc>, pool: &PgPool) -> Result<Vec<ListingId>> {
        sqlx::query_scalar::<_, ListingId>(
            "UPDATE listings
             SET status = 'inactive'
             WHERE (status IS NULL OR status IN ('active', 'approved'))
               AND end_date < $1
             RETURNING id",
        )
        .bind(now)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Host-joined rows for specific listings, whatever their status
    pub async fn find_expired_by_ids(
        ids: &[ListingId],
        pool: &PgPool,
    ) -> Result<Vec<ExpiredListing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ExpiredListing>(
            "SELECT l.*, u.name AS host_name, u.email AS host_email
             FROM listings l
             JOIN users u ON l.user_id = u.id
             WHERE l.id = ANY($1)
             ORDER BY l.end_date",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
