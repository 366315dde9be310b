//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::domains::listings::ListingLifecycleManager;
use crate::server::middleware::admin_auth_middleware;
use crate::server::routes::{expire_listings_handler, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub lifecycle: ListingLifecycleManager,
    pub admin_api_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        lifecycle: ListingLifecycleManager,
        admin_api_token: Option<String>,
    ) -> Self {
        Self {
            db_pool,
            lifecycle,
            admin_api_token: admin_api_token.map(Arc::from),
        }
    }
}

/// Build the Axum application router
///
/// Admin routes are only mounted when an admin token is configured.
pub fn build_app(state: AppState) -> Router {
    let mut app = Router::new().route("/health", get(health_handler));

    match state.admin_api_token.clone() {
        Some(token) => {
            let admin = Router::new()
                .route("/admin/listings/expire", post(expire_listings_handler))
                .layer(middleware::from_fn(move |request, next| {
                    admin_auth_middleware(token.clone(), request, next)
                }));
            app = app.merge(admin);
        }
        None => tracing::warn!("ADMIN_API_TOKEN not set - admin routes disabled"),
    }

    app.layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
