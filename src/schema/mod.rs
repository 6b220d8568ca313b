//! Versioned screen schemas: a file-backed store and the read-through cache in
//! front of it.
//!
//! Schemas are opaque JSON objects addressed by `(screen, version)`. Both
//! segments arrive from clients, so they are validated when a [`SchemaKey`] is
//! built; nothing downstream ever sees an unchecked name.

pub mod cache;
pub mod store;

use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

pub use cache::{CachedSchema, SchemaCache};
pub use store::{FileSchemaStore, SchemaSource};

/// A parsed screen document. Only the top-level shape (an object) is checked.
pub type ScreenSchema = Map<String, Value>;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid screen name: {0:?}")]
    InvalidName(String),

    #[error("invalid schema version: {0:?}")]
    InvalidVersion(String),

    #[error("schema file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed schema {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("schema version not found: {0}")]
    VersionNotFound(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validated `(screen, version)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaKey {
    screen: String,
    version: String,
}

impl SchemaKey {
    pub fn new(screen: impl Into<String>, version: impl Into<String>) -> Result<Self, SchemaError> {
        let screen = screen.into();
        let version = version.into();

        if !is_safe_segment(&screen) {
            return Err(SchemaError::InvalidName(screen));
        }
        validate_version(&version)?;

        Ok(Self { screen, version })
    }

    pub fn screen(&self) -> &str {
        &self.screen
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl std::fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.screen, self.version)
    }
}

pub fn validate_version(version: &str) -> Result<(), SchemaError> {
    if is_safe_segment(version) {
        Ok(())
    } else {
        Err(SchemaError::InvalidVersion(version.to_string()))
    }
}

/// A path segment that cannot climb out of, or descend below, its directory.
fn is_safe_segment(value: &str) -> bool {
    !value.is_empty()
        && !value.contains("..")
        && !value.contains('/')
        && !value.contains('\\')
        && !value.contains('\0')
}
