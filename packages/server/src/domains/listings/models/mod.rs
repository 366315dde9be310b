pub mod host;
pub mod listing;

pub use host::*;
pub use listing::*;
