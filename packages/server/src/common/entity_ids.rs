//! Typed ID aliases for the marketplace entities this service touches.

pub use super::id::Id;

/// Marker type for users (hosts own listings).
pub struct User;

/// Marker type for sublet listings.
pub struct Listing;

pub type UserId = Id<User>;

pub type ListingId = Id<Listing>;
