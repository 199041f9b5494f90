use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use orbit_core::discover_approved_packages;
use serde_json::json;

use super::AppState;

/// `GET /api/packages/approved`
///
/// Always answers 200 with a JSON array. An empty array covers "nothing
/// published", "not configured" and "upstream unreachable" alike; the logs
/// tell them apart.
pub async fn approved(State(state): State<AppState>) -> impl IntoResponse {
    let report = discover_approved_packages(state.source.as_ref(), &state.config).await;
    if report.has_errors() {
        tracing::debug!(diagnostics = ?report.diagnostics, "answering with partial results");
    }

    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(report.into_packages()),
    )
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
