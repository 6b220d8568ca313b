use sqlx::PgPool;
use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::database::models::{ContentItem, ContentPatch, NewContent};
use crate::database::query_builder::{UpdateStatement, CONTENT_COLUMNS};
use crate::types::ContentKind;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{} {id} not found", kind.label())]
    NotFound { kind: ContentKind, id: i32 },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        ContentError::Database(DatabaseError::Sqlx(err))
    }
}

/// CRUD over one content table (categories or brands)
#[derive(Debug, Clone)]
pub struct ContentRepository {
    kind: ContentKind,
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(kind: ContentKind, pool: PgPool) -> Self {
        Self { kind, pool }
    }

    /// Active rows ordered by `(display_order, id)`
    pub async fn list(&self) -> Result<Vec<ContentItem>, ContentError> {
        let sql = list_sql(self.kind);
        let rows = sqlx::query_as::<_, ContentItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Any row by id, active or not
    pub async fn get(&self, id: i32) -> Result<ContentItem, ContentError> {
        let sql = format!(
            "SELECT {} FROM \"{}\" WHERE id = $1",
            CONTENT_COLUMNS,
            self.kind.table()
        );
        sqlx::query_as::<_, ContentItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ContentError::NotFound { kind: self.kind, id })
    }

    pub async fn create(&self, new: NewContent, actor: i32) -> Result<ContentItem, ContentError> {
        if new.name.trim().is_empty() {
            return Err(ContentError::MissingField("name"));
        }
        if new.search_text.trim().is_empty() {
            return Err(ContentError::MissingField("search_text"));
        }

        let sql = format!(
            "INSERT INTO \"{}\" (name, search_text, image_url, display_order, is_active, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $5) RETURNING {}",
            self.kind.table(),
            CONTENT_COLUMNS
        );
        let row = sqlx::query_as::<_, ContentItem>(&sql)
            .bind(&new.name)
            .bind(&new.search_text)
            .bind(&new.image_url)
            .bind(new.display_order)
            .bind(actor)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Applies only the supplied fields plus the audit stamp, in one statement
    pub async fn update(
        &self,
        id: i32,
        patch: ContentPatch,
        actor: i32,
    ) -> Result<ContentItem, ContentError> {
        let statement = UpdateStatement::from_patch(self.kind.table(), id, actor, patch);
        let sql = statement.sql();

        statement
            .bind(sqlx::query_as::<_, ContentItem>(&sql))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ContentError::NotFound { kind: self.kind, id })
    }

    /// Removes the row outright
    pub async fn delete(&self, id: i32) -> Result<(), ContentError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(ContentError::NotFound { kind: self.kind, id });
        }
        Ok(())
    }
}

fn list_sql(kind: ContentKind) -> String {
    format!(
        "SELECT {} FROM \"{}\" WHERE is_active = TRUE ORDER BY display_order ASC, id ASC",
        CONTENT_COLUMNS,
        kind.table()
    )
}
