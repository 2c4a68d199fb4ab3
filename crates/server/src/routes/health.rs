use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Liveness probe.
///
/// Always 200 while the process runs; deliberately does not touch the store.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
