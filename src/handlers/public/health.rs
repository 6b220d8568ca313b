// handlers/public/health.rs - GET /health

use axum::extract::State;
use chrono::Utc;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Liveness plus a round trip to PostgreSQL; 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = DatabaseManager::health_check(&state.pool).await {
        tracing::warn!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Database unavailable"));
    }

    Ok(ApiResponse::success(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "database": "connected"
    })))
}
