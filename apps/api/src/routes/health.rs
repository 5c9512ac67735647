use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Lottery API is running" }))
}

/// GET /health
/// Returns a status object with service version and server time.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "lottery-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
