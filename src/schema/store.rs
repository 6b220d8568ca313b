use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{validate_version, SchemaError, SchemaKey, ScreenSchema};

const SCHEMA_EXTENSION: &str = "json";

/// Source of schema documents consulted by the cache on a miss.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn read(&self, key: &SchemaKey) -> Result<ScreenSchema, SchemaError>;

    /// Screen names available for a version, sorted ascending.
    async fn list_screens(&self, version: &str) -> Result<Vec<String>, SchemaError>;
}

/// Reads `base_path/<version>/<screen>.json`.
#[derive(Debug, Clone)]
pub struct FileSchemaStore {
    base_path: PathBuf,
}

impl FileSchemaStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn schema_path(&self, key: &SchemaKey) -> PathBuf {
        self.base_path
            .join(key.version())
            .join(format!("{}.{}", key.screen(), SCHEMA_EXTENSION))
    }
}

#[async_trait]
impl SchemaSource for FileSchemaStore {
    async fn read(&self, key: &SchemaKey) -> Result<ScreenSchema, SchemaError> {
        let path = self.schema_path(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(SchemaError::NotFound(path)),
            Err(source) => return Err(SchemaError::Io { path, source }),
        };

        serde_json::from_slice::<ScreenSchema>(&bytes).map_err(|e| SchemaError::Malformed {
            path,
            reason: e.to_string(),
        })
    }

    async fn list_screens(&self, version: &str) -> Result<Vec<String>, SchemaError> {
        validate_version(version)?;
        let dir = self.base_path.join(version);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SchemaError::VersionNotFound(version.to_string()))
            }
            Err(source) => return Err(SchemaError::Io { path: dir, source }),
        };

        let mut screens = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => return Err(SchemaError::Io { path: dir, source }),
            };

            let file_type = entry.file_type().await.map_err(|source| SchemaError::Io {
                path: entry.path(),
                source,
            })?;
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SCHEMA_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                screens.push(stem.to_string());
            }
        }

        screens.sort();
        Ok(screens)
    }
}
