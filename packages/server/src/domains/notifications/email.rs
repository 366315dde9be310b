//! Host notifiers backed by the email service.

use anyhow::Result;
use async_trait::async_trait;
use email_client::{EmailServiceClient, ListingSummary};
use std::sync::Arc;
use tracing::info;

use crate::domains::listings::models::ExpiredListing;
use crate::kernel::BaseListingNotifier;

// =============================================================================
// EmailServiceClient Adapter (implements BaseListingNotifier trait)
// =============================================================================

/// Wrapper around EmailServiceClient that implements BaseListingNotifier
pub struct EmailListingNotifier(pub Arc<EmailServiceClient>);

impl EmailListingNotifier {
    pub fn new(client: Arc<EmailServiceClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseListingNotifier for EmailListingNotifier {
    async fn notify_expired(
        &self,
        host_email: &str,
        host_name: &str,
        listing: &ExpiredListing,
    ) -> Result<()> {
        let response = self
            .0
            .send_listing_expired(host_email, host_name, &summary(listing))
            .await?;

        info!(
            listing_id = %listing.listing.id,
            message = %response.message,
            "Listing expiration email sent"
        );
        Ok(())
    }
}

// =============================================================================
// Log-only notifier (local development, MOCK_EMAIL=true)
// =============================================================================

/// Logs what would have been sent instead of calling the email service.
#[derive(Debug, Default, Clone)]
pub struct LogOnlyNotifier;

impl LogOnlyNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BaseListingNotifier for LogOnlyNotifier {
    async fn notify_expired(
        &self,
        host_email: &str,
        _host_name: &str,
        listing: &ExpiredListing,
    ) -> Result<()> {
        info!(
            to = %host_email,
            subject = %expired_subject(listing),
            end_date = %listing.listing.end_date.format("%Y-%m-%d"),
            "[MOCK EMAIL] listing_expired notification"
        );
        Ok(())
    }
}

pub fn expired_subject(listing: &ExpiredListing) -> String {
    format!(
        "Your listing '{}' has expired on Subly",
        listing.listing.title
    )
}

fn summary(listing: &ExpiredListing) -> ListingSummary {
    ListingSummary {
        id: listing.listing.id.to_string(),
        title: listing.listing.title.clone(),
    }
}
