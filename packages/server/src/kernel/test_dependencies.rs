// TestDependencies - mock implementations for testing
//
// In-memory stand-ins for the listing store and the host notifier so the
// lifecycle manager can be exercised without Postgres or the email service.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::{BaseListingNotifier, BaseListingStore};
use crate::common::{ListingId, UserId};
use crate::domains::listings::models::{ExpiredListing, Listing, ListingStatus};

/// Build a host-joined listing row for mocks and unit tests.
pub fn listing_row_fixture(
    title: &str,
    status: Option<ListingStatus>,
    end_date: DateTime<Utc>,
    host_name: &str,
    host_email: &str,
) -> ExpiredListing {
    ExpiredListing {
        listing: Listing {
            id: ListingId::new(),
            user_id: UserId::new(),
            title: title.to_string(),
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
            status: status.map(|s| s.as_str().to_string()),
            created_at: Utc::now(),
        },
        host_name: host_name.to_string(),
        host_email: host_email.to_string(),
    }
}

// =============================================================================
// Mock Listing Store
// =============================================================================

#[derive(Default)]
struct MockStoreState {
    rows: Vec<ExpiredListing>,
    /// Inserted right after the next snapshot read, before the bulk write
    arrive_after_read: Vec<ExpiredListing>,
    fail_reads: bool,
    fail_writes: bool,
    fetch_calls: usize,
    retire_calls: usize,
}

/// In-memory listing table applying the same live-and-expired predicate as SQL.
#[derive(Clone, Default)]
pub struct MockListingStore {
    state: Arc<Mutex<MockStoreState>>,
}

impl MockListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(self, listing: ExpiredListing) -> Self {
        self.state.lock().unwrap().rows.push(listing);
        self
    }

    /// Simulate a listing that becomes live-and-expired between the
    /// snapshot read and the bulk write of the next sweep.
    pub fn with_listing_arriving_after_read(self, listing: ExpiredListing) -> Self {
        self.state.lock().unwrap().arrive_after_read.push(listing);
        self
    }

    pub fn failing_reads(self) -> Self {
        self.state.lock().unwrap().fail_reads = true;
        self
    }

    pub fn failing_writes(self) -> Self {
        self.state.lock().unwrap().fail_writes = true;
        self
    }

    /// Current status of a listing, `None` if unset
    pub fn status_of(&self, id: ListingId) -> Option<ListingStatus> {
        self.state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|row| row.listing.id == id)
            .and_then(|row| row.listing.status())
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_calls
    }

    pub fn retire_calls(&self) -> usize {
        self.state.lock().unwrap().retire_calls
    }
}

#[async_trait]
impl BaseListingStore for MockListingStore {
    async fn fetch_live_expired(&self, now: DateTime<Utc>) -> Result<Vec<ExpiredListing>> {
        let mut state = self.state.lock().unwrap();
        state.fetch_calls += 1;
        if state.fail_reads {
            anyhow::bail!("connection refused");
        }

        let snapshot = state
            .rows
            .iter()
            .filter(|row| row.listing.is_live_expired(now))
            .cloned()
            .collect();

        let arrivals = std::mem::take(&mut state.arrive_after_read);
        state.rows.extend(arrivals);

        Ok(snapshot)
    }

    async fn retire_live_expired(&self, now: DateTime<Utc>) -> Result<Vec<ListingId>> {
        let mut state = self.state.lock().unwrap();
        state.retire_calls += 1;
        if state.fail_writes {
            anyhow::bail!("deadlock detected");
        }

        let mut retired = Vec::new();
        for row in state.rows.iter_mut() {
            if row.listing.is_live_expired(now) {
                row.listing.status = Some(ListingStatus::Inactive.to_string());
                retired.push(row.listing.id);
            }
        }
        Ok(retired)
    }

    async fn fetch_expired_by_ids(&self, ids: &[ListingId]) -> Result<Vec<ExpiredListing>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .iter()
            .filter(|row| ids.contains(&row.listing.id))
            .cloned()
            .collect())
    }
}

// =============================================================================
// Mock Listing Notifier
// =============================================================================

/// Arguments captured from a notify call
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyCall {
    pub host_email: String,
    pub host_name: String,
    pub listing_id: ListingId,
    pub listing_title: String,
}

#[derive(Clone, Default)]
pub struct MockListingNotifier {
    calls: Arc<Mutex<Vec<NotifyCall>>>,
    fail_for: Arc<Mutex<HashSet<ListingId>>>,
    panic_for: Arc<Mutex<HashSet<ListingId>>>,
}

impl MockListingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the notification for this listing return an error
    pub fn failing_for(self, id: ListingId) -> Self {
        self.fail_for.lock().unwrap().insert(id);
        self
    }

    /// Make the notification for this listing panic
    pub fn panicking_for(self, id: ListingId) -> Self {
        self.panic_for.lock().unwrap().insert(id);
        self
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_notified(&self, id: ListingId) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|call| call.listing_id == id)
    }
}

#[async_trait]
impl BaseListingNotifier for MockListingNotifier {
    async fn notify_expired(
        &self,
        host_email: &str,
        host_name: &str,
        listing: &ExpiredListing,
    ) -> Result<()> {
        let id = listing.listing.id;
        self.calls.lock().unwrap().push(NotifyCall {
            host_email: host_email.to_string(),
            host_name: host_name.to_string(),
            listing_id: id,
            listing_title: listing.listing.title.clone(),
        });

        if self.panic_for.lock().unwrap().contains(&id) {
            panic!("mock notifier panicked for {}", id);
        }
        if self.fail_for.lock().unwrap().contains(&id) {
            anyhow::bail!("email service returned 502");
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks sharing state with the trait objects handed out.
#[derive(Clone, Default)]
pub struct TestDependencies {
    pub store: MockListingStore,
    pub notifier: MockListingNotifier,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store: MockListingStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_notifier(mut self, notifier: MockListingNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store_arc(&self) -> Arc<dyn BaseListingStore> {
        Arc::new(self.store.clone())
    }

    pub fn notifier_arc(&self) -> Arc<dyn BaseListingNotifier> {
        Arc::new(self.notifier.clone())
    }
}
