//! Request middleware.

use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{InternalErrorDetail, INTERNAL_MESSAGE};
use crate::state::AppState;

/// Add a `details` field to sanitized 500 bodies when running in
/// development.
///
/// The environment comes from the router's own [`AppState`], so routers
/// built with different configs in one process do not affect each other.
pub async fn expose_error_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(InternalErrorDetail(detail)) = response.extensions_mut().remove::<InternalErrorDetail>()
    else {
        return response;
    };
    if !state.config.environment.is_development() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    let body = json!({
        "error": INTERNAL_MESSAGE,
        "code": "INTERNAL_ERROR",
        "details": detail,
    });
    (parts, Json(body)).into_response()
}
