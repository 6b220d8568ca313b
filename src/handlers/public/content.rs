// handlers/public/content.rs - GET /api/v1/content/{categories|brands}

use axum::extract::State;

use crate::database::models::ContentItem;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::ContentKind;

async fn list(state: &AppState, kind: ContentKind) -> ApiResult<Vec<ContentItem>> {
    let items = state.content(kind).list().await?;
    Ok(ApiResponse::success(items))
}

/// Active categories, ordered by `display_order` then `id`
pub async fn categories_get(State(state): State<AppState>) -> ApiResult<Vec<ContentItem>> {
    list(&state, ContentKind::Category).await
}

/// Active brands, ordered by `display_order` then `id`
pub async fn brands_get(State(state): State<AppState>) -> ApiResult<Vec<ContentItem>> {
    list(&state, ContentKind::Brand).await
}
