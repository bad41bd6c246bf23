use axum::Json;
use serde_json::{json, Value};

/// Liveness probe; no database or storage round-trip.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
