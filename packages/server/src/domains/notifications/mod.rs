pub mod email;

pub use email::{EmailListingNotifier, LogOnlyNotifier};
