// handlers/protected/auth.rs - POST /api/v1/auth/logout, GET /api/v1/auth/me

use axum::extract::State;
use serde_json::{json, Value};
use tracing::info;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// Deletes the caller's session; the token is refused from then on
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> ApiResult<Value> {
    if state.auth.revoke(&user.token).await? {
        info!("User logged out: {}", user.username);
    }

    Ok(ApiResponse::flat(json!({ "message": "Logged out successfully" })))
}

pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Value> {
    let profile = state.auth.profile(user.user_id).await?;
    Ok(ApiResponse::flat(json!({ "user": profile })))
}
