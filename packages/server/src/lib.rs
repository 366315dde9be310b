// Subly listing lifecycle service - API Core
//
// Retires sublet listings once their availability window has passed and
// notifies the owning host. Postgres is the source of truth; the email
// microservice and the cron scheduler are injected collaborators.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
