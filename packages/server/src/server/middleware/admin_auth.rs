use axum::{
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

/// Shared-secret authentication for admin routes
///
/// Expects `Authorization: Bearer <ADMIN_API_TOKEN>`. Anything else is
/// rejected with 401 before the handler runs.
pub async fn admin_auth_middleware(
    admin_token: Arc<str>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = extract_bearer(&request);
    let presented = token.map(|token| tokens_match(token, &admin_token));

    match presented {
        Some(true) => next.run(request).await,
        _ => {
            warn!(
                path = %request.uri().path(),
                token_present = presented.is_some(),
                "Rejected admin request"
            );
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Admin token required"})),
            )
                .into_response()
        }
    }
}

/// Compare in time independent of where the first mismatch is
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    if presented.len() != expected.len() {
        return false;
    }
    let diff = presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b));
    diff == 0
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(request: &axum::http::Request<axum::body::Body>) -> Option<&str> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(str::trim)
}
