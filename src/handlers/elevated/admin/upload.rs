// handlers/elevated/admin/upload.rs - POST /api/v1/admin/upload

use axum::{
    body::Bytes,
    extract::{Multipart, State},
};
use futures::stream;
use tracing::info;

use crate::error::ApiError;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::services::{ImageStore, UploadKind, UploadedAsset};
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const TYPE_FIELD: &str = "type";

/// Stores an image in the bucket named by the `type` field.
///
/// When `type` precedes `file` in the form the file streams straight to disk.
/// Otherwise its chunks are held until the form ends, which the request body
/// limit bounds. Only the last `file` part is kept.
pub async fn upload(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> ApiResult<UploadedAsset> {
    let mut form = UploadForm::default();
    if let Err(e) = form.fill(&mut multipart, &state.images).await {
        form.discard_stored(&state.images).await;
        return Err(e);
    }

    let kind = form.kind.unwrap_or(UploadKind::General);
    let (asset, kind) = match (form.stored, form.pending) {
        (Some(stored), _) => stored,
        (None, Some((original, chunks))) => {
            let body = stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>));
            (state.images.ingest(body, &original, kind).await?, kind)
        }
        (None, None) => return Err(ApiError::bad_request("No file uploaded")),
    };

    info!(
        "Upload {} ({} bytes) stored in {} by {}",
        asset.filename,
        asset.size,
        kind.subdir(),
        admin.0.username
    );
    Ok(ApiResponse::flat(asset))
}

#[derive(Default)]
struct UploadForm {
    kind: Option<UploadKind>,
    stored: Option<(UploadedAsset, UploadKind)>,
    pending: Option<(String, Vec<Bytes>)>,
}

impl UploadForm {
    async fn fill(&mut self, multipart: &mut Multipart, images: &ImageStore) -> Result<(), ApiError> {
        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                TYPE_FIELD => {
                    self.kind = Some(UploadKind::from_form_value(&field.text().await?));
                }
                FILE_FIELD => {
                    let original = field
                        .file_name()
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

                    if let Some(kind) = self.kind {
                        let asset = images.ingest(field, &original, kind).await?;
                        self.pending = None;
                        self.replace_stored(images, (asset, kind)).await;
                    } else {
                        ImageStore::validate_extension(&original)?;
                        let mut chunks = Vec::new();
                        while let Some(chunk) = field.chunk().await? {
                            chunks.push(chunk);
                        }
                        self.discard_stored(images).await;
                        self.pending = Some((original, chunks));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn replace_stored(&mut self, images: &ImageStore, next: (UploadedAsset, UploadKind)) {
        if let Some((previous, kind)) = self.stored.replace(next) {
            images.discard(kind, &previous).await;
        }
    }

    async fn discard_stored(&mut self, images: &ImageStore) {
        if let Some((asset, kind)) = self.stored.take() {
            images.discard(kind, &asset).await;
        }
    }
}
