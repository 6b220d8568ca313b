use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A category or brand row. Both tables share this shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentItem {
    pub id: i32,
    pub name: String,
    pub search_text: String,
    pub image_url: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<i32>,
}

/// Fields accepted on create; `is_active` always starts true.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContent {
    pub name: String,
    pub search_text: String,
    pub image_url: String,
    #[serde(default)]
    pub display_order: i32,
}

/// Partial update: `None` means "leave the column alone".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentPatch {
    pub name: Option<String>,
    pub search_text: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
