//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use subly_core::domains::listings::{Host, Listing, ListingStatus, NewListing};

/// Create a host with a unique email
pub async fn create_test_host(pool: &PgPool, name: &str) -> Result<Host> {
    let email = format!(
        "{}-{}@example.com",
        name.to_lowercase(),
        uuid::Uuid::new_v4().simple()
    );
    Host::create(name, &email, pool).await
}

/// Create a listing for `host` with the given status and end date
pub async fn create_test_listing(
    pool: &PgPool,
    host: &Host,
    title: &str,
    status: Option<ListingStatus>,
    end_date: DateTime<Utc>,
) -> Result<Listing> {
    let mut new = NewListing::new(host.id, title, end_date).with_status(status);
    new.city = Some("Madison".to_string());
    new.state = Some("WI".to_string());
    new.price_per_night = Some(45.0);
    new.start_date = Some(end_date - Duration::days(90));
    Listing::create(new, pool).await
}

pub fn yesterday() -> DateTime<Utc> {
    Utc::now() - Duration::days(1)
}

pub fn tomorrow() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}
