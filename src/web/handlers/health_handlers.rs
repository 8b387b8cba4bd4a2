use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

/// Liveness probe endpoint
/// Returns 200 OK if the service is running
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe endpoint
pub async fn readiness() -> Json<Value> {
    Json(json!({
        "status": "ready",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Health check endpoint with service information
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
