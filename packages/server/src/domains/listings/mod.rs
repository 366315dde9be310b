pub mod lifecycle;
pub mod models;
pub mod store;

pub use lifecycle::{
    ExpirationSchedule, LifecycleError, ListingLifecycleManager, NotificationOutcome,
    NotificationResult, SweepReport,
};
pub use models::{ExpiredListing, Host, LifecycleState, Listing, ListingStatus, NewListing};
pub use store::PostgresListingStore;
