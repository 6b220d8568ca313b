use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{AuthError, JwtCodec};
use crate::config::{AppConfig, SchemaConfig};
use crate::database::{ContentRepository, UserRepository};
use crate::schema::{FileSchemaStore, SchemaCache, SchemaSource};
use crate::services::{AuthService, ImageStore};
use crate::types::ContentKind;

/// Shared handles passed to every handler through `State`
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub schemas: Arc<SchemaCache>,
    pub schema_settings: Arc<SchemaConfig>,
    pub auth: Arc<AuthService>,
    pub images: Arc<ImageStore>,
    pub categories: ContentRepository,
    pub brands: ContentRepository,
}

impl AppState {
    /// Wire the file-backed schema store from configuration
    pub fn from_config(config: &AppConfig, pool: PgPool) -> Result<Self, AuthError> {
        let store = FileSchemaStore::new(config.schema.base_path.clone());
        Self::with_schema_source(config, pool, Arc::new(store))
    }

    pub fn with_schema_source(
        config: &AppConfig,
        pool: PgPool,
        source: Arc<dyn SchemaSource>,
    ) -> Result<Self, AuthError> {
        let jwt = JwtCodec::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;
        let auth = AuthService::new(UserRepository::new(pool.clone()), jwt);

        Ok(Self {
            schemas: Arc::new(SchemaCache::new(source, config.schema.cache_ttl())),
            schema_settings: Arc::new(config.schema.clone()),
            auth: Arc::new(auth),
            images: Arc::new(ImageStore::new(
                config.upload.dir.clone(),
                config.server.base_url.clone(),
            )),
            categories: ContentRepository::new(ContentKind::Category, pool.clone()),
            brands: ContentRepository::new(ContentKind::Brand, pool.clone()),
            pool,
        })
    }

    pub fn content(&self, kind: ContentKind) -> &ContentRepository {
        match kind {
            ContentKind::Category => &self.categories,
            ContentKind::Brand => &self.brands,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
