// Multipart form shared by the content create and update handlers.
//
// Text fields are collected as they arrive; the `image` part is streamed
// straight into the image store so large files never sit in memory.

use axum::extract::Multipart;
use std::collections::HashMap;

use crate::database::models::{ContentPatch, NewContent};
use crate::database::ContentError;
use crate::error::ApiError;
use crate::services::{ImageStore, UploadKind, UploadedAsset};

pub(super) const IMAGE_FIELD: &str = "image";

#[derive(Debug, Default)]
pub(super) struct ContentForm {
    fields: HashMap<String, String>,
    image: Option<UploadedAsset>,
}

impl ContentForm {
    /// Read every part of the request. On failure any image already stored
    /// for this request is removed again.
    pub(super) async fn read(
        multipart: &mut Multipart,
        images: &ImageStore,
        kind: UploadKind,
    ) -> Result<Self, ApiError> {
        let mut form = ContentForm::default();
        if let Err(e) = form.fill(multipart, images, kind).await {
            form.discard_image(images, kind).await;
            return Err(e);
        }
        Ok(form)
    }

    async fn fill(
        &mut self,
        multipart: &mut Multipart,
        images: &ImageStore,
        kind: UploadKind,
    ) -> Result<(), ApiError> {
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                // An empty file input arrives without a filename
                let original = match field.file_name() {
                    Some(file_name) if !file_name.is_empty() => file_name.to_string(),
                    _ => continue,
                };
                let asset = images.ingest(field, &original, kind).await?;
                if let Some(previous) = self.image.replace(asset) {
                    images.discard(kind, &previous).await;
                }
            } else {
                let value = field.text().await?;
                self.fields.insert(name, value);
            }
        }
        Ok(())
    }

    pub(super) async fn discard_image(&mut self, images: &ImageStore, kind: UploadKind) {
        if let Some(asset) = self.image.take() {
            images.discard(kind, &asset).await;
        }
    }

    pub(super) fn has_image(&self) -> bool {
        self.image.is_some()
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn int(&self, field: &'static str) -> Result<Option<i32>, ContentError> {
        self.text(field)
            .map(|value| {
                value.parse::<i32>().map_err(|_| ContentError::InvalidField {
                    field,
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// Fields for a new row. `name`, `search_text` and the image are required.
    pub(super) fn new_content(&self) -> Result<NewContent, ContentError> {
        let name = self.text("name").ok_or(ContentError::MissingField("name"))?;
        let search_text = self
            .text("search_text")
            .ok_or(ContentError::MissingField("search_text"))?;
        let display_order = self.int("display_order")?.unwrap_or(0);
        let image = self
            .image
            .as_ref()
            .ok_or(ContentError::MissingField(IMAGE_FIELD))?;

        Ok(NewContent {
            name: name.to_string(),
            search_text: search_text.to_string(),
            image_url: image.url.clone(),
            display_order,
        })
    }

    /// Every non-empty field becomes part of the patch; `is_active` is true only for "true"
    pub(super) fn patch(&self) -> Result<ContentPatch, ContentError> {
        Ok(ContentPatch {
            name: self.text("name").map(str::to_string),
            search_text: self.text("search_text").map(str::to_string),
            image_url: self.image.as_ref().map(|asset| asset.url.clone()),
            display_order: self.int("display_order")?,
            is_active: self.text("is_active").map(|v| v == "true"),
        })
    }
}
