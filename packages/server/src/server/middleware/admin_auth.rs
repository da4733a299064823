//! Admin gate for the dedup/merge endpoints.
//!
//! Rejects non-administrative callers with 401 before any read or scoring
//! work runs. The actual classification is delegated to the configured
//! authorizer.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::kernel::BaseAuthorizer;

/// Extract the bearer token from the Authorization header.
fn bearer_token(request: &axum::http::Request<axum::body::Body>) -> Option<String> {
    let header = request.headers().get("authorization")?;
    let value = header.to_str().ok()?;
    // Accept both "Bearer <token>" and a raw token
    Some(value.strip_prefix("Bearer ").unwrap_or(value).to_string())
}

pub async fn admin_auth_middleware(
    authorizer: Arc<dyn BaseAuthorizer>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = bearer_token(&request);

    if !authorizer.is_admin(token.as_deref()).await {
        tracing::debug!("Rejected non-administrative caller");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "admin access required" })),
        )
            .into_response();
    }

    next.run(request).await
}
