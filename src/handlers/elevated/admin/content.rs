// handlers/elevated/admin/content.rs - /api/v1/admin/{categories|brands}
//
// Both tables share one set of handlers; the route picks the `ContentKind`.

use axum::extract::{Multipart, Path, State};
use serde_json::{json, Value};
use tracing::info;

use super::form::ContentForm;
use crate::database::models::ContentItem;
use crate::error::ApiError;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::ContentKind;

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::invalid_parameter("Invalid ID"))
}

pub async fn list(state: &AppState, kind: ContentKind) -> ApiResult<Vec<ContentItem>> {
    let items = state.content(kind).list().await?;
    Ok(ApiResponse::success(items))
}

pub async fn show(state: &AppState, kind: ContentKind, id: &str) -> ApiResult<ContentItem> {
    let id = parse_id(id)?;
    let item = state.content(kind).get(id).await?;
    Ok(ApiResponse::success(item))
}

/// Multipart create; the stored image is removed again if the row is not written
pub async fn create(
    state: &AppState,
    kind: ContentKind,
    admin: &AdminUser,
    mut multipart: Multipart,
) -> ApiResult<ContentItem> {
    let upload_kind = kind.upload_kind();
    let mut form = ContentForm::read(&mut multipart, &state.images, upload_kind).await?;

    let result = match form.new_content() {
        Ok(new) => state
            .content(kind)
            .create(new, admin.0.user_id)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(item) => {
            info!("{} {} created by {}", kind.label(), item.id, admin.0.username);
            Ok(ApiResponse::created(item))
        }
        Err(e) => {
            form.discard_image(&state.images, upload_kind).await;
            Err(e)
        }
    }
}

/// Multipart partial update. Only the fields present in the form are written.
pub async fn update(
    state: &AppState,
    kind: ContentKind,
    admin: &AdminUser,
    id: &str,
    mut multipart: Multipart,
) -> ApiResult<ContentItem> {
    let id = parse_id(id)?;
    let upload_kind = kind.upload_kind();
    let mut form = ContentForm::read(&mut multipart, &state.images, upload_kind).await?;

    let result = match form.patch() {
        Ok(patch) => state
            .content(kind)
            .update(id, patch, admin.0.user_id)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(item) => {
            info!(
                "{} {} updated by {}{}",
                kind.label(),
                id,
                admin.0.username,
                if form.has_image() { " (new image)" } else { "" }
            );
            Ok(ApiResponse::success(item))
        }
        Err(e) => {
            form.discard_image(&state.images, upload_kind).await;
            Err(e)
        }
    }
}

pub async fn delete(
    state: &AppState,
    kind: ContentKind,
    admin: &AdminUser,
    id: &str,
) -> ApiResult<Value> {
    let id = parse_id(id)?;
    state.content(kind).delete(id).await?;

    info!("{} {} deleted by {}", kind.label(), id, admin.0.username);
    Ok(ApiResponse::success(json!({
        "message": format!("{} deleted", kind.label())
    })))
}

// Route entry points. Axum handlers cannot take the kind as an argument, so
// each table gets thin wrappers around the shared functions above.

pub async fn categories_list(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Vec<ContentItem>> {
    list(&state, ContentKind::Category).await
}

pub async fn categories_show(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<ContentItem> {
    show(&state, ContentKind::Category, &id).await
}

pub async fn categories_create(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> ApiResult<ContentItem> {
    create(&state, ContentKind::Category, &admin, multipart).await
}

pub async fn categories_update(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ContentItem> {
    update(&state, ContentKind::Category, &admin, &id, multipart).await
}

pub async fn categories_delete(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    delete(&state, ContentKind::Category, &admin, &id).await
}

pub async fn brands_list(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Vec<ContentItem>> {
    list(&state, ContentKind::Brand).await
}

pub async fn brands_show(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<ContentItem> {
    show(&state, ContentKind::Brand, &id).await
}

pub async fn brands_create(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> ApiResult<ContentItem> {
    create(&state, ContentKind::Brand, &admin, multipart).await
}

pub async fn brands_update(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ContentItem> {
    update(&state, ContentKind::Brand, &admin, &id, multipart).await
}

pub async fn brands_delete(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    delete(&state, ContentKind::Brand, &admin, &id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for raw in ["abc", "4.2", "", "99999999999"] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_PARAMETER", "{raw}");
        }
    }
}
