// handlers/elevated/admin/cache.rs - POST /api/v1/admin/cache/clear

use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::state::AppState;

/// Drops every cached schema; the next request per key reads the store again
pub async fn clear(State(state): State<AppState>, admin: AdminUser) -> ApiResult<Value> {
    let entries = state.schemas.len().await;
    state.schemas.invalidate().await;

    tracing::info!("Schema cache cleared by {} ({} entries)", admin.0.username, entries);
    Ok(ApiResponse::flat(json!({ "message": "Cache cleared" })))
}
