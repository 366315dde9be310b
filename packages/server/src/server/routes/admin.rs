use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::common::ListingId;
use crate::domains::listings::NotificationOutcome;
use crate::server::app::AppState;

#[derive(Debug, Serialize)]
pub struct ExpireListingsResponse {
    pub swept_at: DateTime<Utc>,
    pub retired: usize,
    pub notified: usize,
    pub failed: usize,
    pub retired_ids: Vec<ListingId>,
    pub notifications: Vec<NotificationOutcome>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Run one expiration sweep now (POST /admin/listings/expire)
///
/// Responds once the sweep finished. Store failures are a 500; failed host
/// emails are listed in the body but do not fail the request.
pub async fn expire_listings_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<ExpireListingsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let report = state.lifecycle.manual_trigger().await.map_err(|e| {
        error!(error = %e, "Manual listing expiration failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(ExpireListingsResponse {
        swept_at: report.swept_at,
        retired: report.retired_count(),
        notified: report.delivered_count(),
        failed: report.failed_count(),
        retired_ids: report.retired,
        notifications: report.notifications,
    }))
}
