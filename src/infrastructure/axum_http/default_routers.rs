use axum::{Json, http::StatusCode, http::Uri, response::IntoResponse};
use serde::Serialize;
use tracing::debug;

use crate::infrastructure::axum_http::error_responses::ErrorResponse;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
}

/// Unmatched routes answer with the same JSON shape as handler errors.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    debug!(path = %uri.path(), "catalog router: no route matched");
    let body = ErrorResponse {
        code: StatusCode::NOT_FOUND.as_u16(),
        message: format!("no route for {}", uri.path()),
    };
    (StatusCode::NOT_FOUND, Json(body))
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
