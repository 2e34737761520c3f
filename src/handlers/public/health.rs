// handlers/public/health.rs - Liveness and readiness

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

/// GET / - the storefront pings this to check the API is up
pub async fn root() -> &'static str {
    "NP International server is running"
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Document store unavailable")
    })?;

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
