// handlers/public/auth.rs - POST /api/v1/auth/login

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Exchange credentials for a bearer token.
///
/// Unknown users and wrong passwords get the same 401 so usernames cannot be probed.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected login body: {}", e);
        ApiError::bad_request("Invalid request")
    })?;

    let outcome = state
        .auth
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(ApiResponse::flat(LoginResponse {
        token: outcome.token,
        expires_at: outcome.expires_at,
        user: outcome.user,
    }))
}
