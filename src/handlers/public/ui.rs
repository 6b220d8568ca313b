// handlers/public/ui.rs - GET /api/v1/ui, /api/v1/ui/version, /api/v1/ui/screens

use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::SchemaKey;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScreenQuery {
    pub screen: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub app_version: String,
    pub min_version: String,
    pub force_update: bool,
    pub available_screens: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Empty values count as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn version_or_default(state: &AppState, version: Option<String>) -> String {
    non_empty(version).unwrap_or_else(|| state.schema_settings.default_version.clone())
}

/// GET /api/v1/ui?screen={name}&version={v}
///
/// Serves the schema through the read-through cache. Missing and malformed
/// schema files both answer 404 `SCHEMA_NOT_FOUND`.
pub async fn screen_get(
    State(state): State<AppState>,
    Query(query): Query<ScreenQuery>,
) -> ApiResult<Value> {
    let screen = non_empty(query.screen)
        .ok_or_else(|| ApiError::missing_parameter("Screen parameter is required"))?;
    let version = version_or_default(&state, query.version);

    let key = SchemaKey::new(screen, version).map_err(|e| {
        warn!("Rejected schema request: {}", e);
        ApiError::from(e)
    })?;

    let cached = state.schemas.get(&key).await?;

    Ok(ApiResponse::flat(json!({
        "data": &*cached.schema,
        "version": key.version(),
        "cached_at": cached.cached_at,
    })))
}

/// GET /api/v1/ui/version?version={v}
///
/// Never fails on an unknown version; the screen list is simply empty.
pub async fn version_get(
    State(state): State<AppState>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<VersionInfo> {
    let version = version_or_default(&state, query.version);

    let available_screens = match state.schemas.list_screens(&version).await {
        Ok(screens) => screens,
        Err(e) => {
            debug!("No screens for version {:?}: {}", version, e);
            Vec::new()
        }
    };

    let settings = &state.schema_settings;
    Ok(ApiResponse::flat(VersionInfo {
        app_version: settings.app_version.clone(),
        min_version: settings.min_version.clone(),
        force_update: settings.force_update,
        available_screens,
        updated_at: Utc::now(),
    }))
}

/// GET /api/v1/ui/screens?version={v}
pub async fn screens_get(
    State(state): State<AppState>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<Value> {
    let version = version_or_default(&state, query.version);
    let screens = state.schemas.list_screens(&version).await?;

    Ok(ApiResponse::flat(json!({
        "screens": screens,
        "version": version,
    })))
}
