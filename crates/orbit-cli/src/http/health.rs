use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::AppState;

pub async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "repository_configured": state.config.is_enabled(),
    }))
}
