//! Shared types used across the codebase

use serde::{Deserialize, Serialize};

use crate::services::upload_service::UploadKind;

/// The two structurally identical content tables managed through the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Category,
    Brand,
}

impl ContentKind {
    /// Backing table. Only these literals are ever interpolated into SQL.
    pub fn table(self) -> &'static str {
        match self {
            ContentKind::Category => "categories",
            ContentKind::Brand => "brands",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Category => "Category",
            ContentKind::Brand => "Brand",
        }
    }

    /// Where images attached to this kind are stored
    pub fn upload_kind(self) -> UploadKind {
        match self {
            ContentKind::Category => UploadKind::Category,
            ContentKind::Brand => UploadKind::Brand,
        }
    }
}
