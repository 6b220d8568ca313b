use axum::body::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file type not allowed: {0:?}")]
    InvalidType(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("upload exceeds the request size limit")]
    TooLarge,

    #[error("upload interrupted: {0}")]
    Interrupted(String),
}

impl From<axum::extract::multipart::MultipartError> for UploadError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge
        } else {
            UploadError::Interrupted(err.body_text())
        }
    }
}

/// Storage bucket for an upload; each maps to one subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Category,
    Brand,
    Banner,
    General,
}

impl UploadKind {
    pub const ALL: [UploadKind; 4] = [
        UploadKind::Category,
        UploadKind::Brand,
        UploadKind::Banner,
        UploadKind::General,
    ];

    /// Unknown or empty values fall back to `General`
    pub fn from_form_value(value: &str) -> Self {
        match value.trim() {
            "category" => UploadKind::Category,
            "brand" => UploadKind::Brand,
            "banner" => UploadKind::Banner,
            _ => UploadKind::General,
        }
    }

    pub fn subdir(self) -> &'static str {
        match self {
            UploadKind::Category => "categories",
            UploadKind::Brand => "brands",
            UploadKind::Banner => "banners",
            UploadKind::General => "general",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedAsset {
    pub filename: String,
    pub size: u64,
    pub url: String,
}

/// Writes validated image uploads under `root/<subdir>/` and hands back
/// their public URL.
#[derive(Debug)]
pub struct ImageStore {
    root: PathBuf,
    base_url: String,
    sequence: AtomicU64,
}

impl ImageStore {
    /// `base_url` is the public origin; files are served below `/uploads`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_directories(&self) -> Result<(), UploadError> {
        for kind in UploadKind::ALL {
            tokio::fs::create_dir_all(self.root.join(kind.subdir())).await?;
        }
        Ok(())
    }

    /// Lowercased extension of an allowed image name
    pub fn validate_extension(original_name: &str) -> Result<String, UploadError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| UploadError::InvalidType(original_name.to_string()))?;

        if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(extension)
        } else {
            Err(UploadError::InvalidType(original_name.to_string()))
        }
    }

    /// `<unix seconds>_<12 hex chars>.<ext>`. The hash covers the original name,
    /// the timestamp and a per-process sequence number, so names never repeat
    /// within one process.
    pub fn generate_filename(&self, original_name: &str, extension: &str, timestamp: i64) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);

        let mut hasher = Sha256::new();
        hasher.update(format!("{}-{}-{}", original_name, timestamp, sequence).as_bytes());
        let digest = format!("{:x}", hasher.finalize());

        format!("{}_{}.{}", timestamp, &digest[..12], extension)
    }

    pub fn public_url(&self, kind: UploadKind, filename: &str) -> String {
        format!("{}/uploads/{}/{}", self.base_url, kind.subdir(), filename)
    }

    /// Streams an upload to disk. Nothing is written when the extension is
    /// rejected; a failed or interrupted stream leaves no partial file behind.
    pub async fn ingest<S, E>(
        &self,
        body: S,
        original_name: &str,
        kind: UploadKind,
    ) -> Result<UploadedAsset, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<UploadError>,
    {
        let extension = Self::validate_extension(original_name)?;
        let filename = self.generate_filename(original_name, &extension, Utc::now().timestamp());

        let dir = self.root.join(kind.subdir());
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(&filename);

        match Self::write_stream(&path, body).await {
            Ok(size) => {
                info!("Stored upload {} ({} bytes) in {}", filename, size, kind.subdir());
                Ok(UploadedAsset {
                    url: self.public_url(kind, &filename),
                    filename,
                    size,
                })
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    warn!("Failed to remove partial upload {}: {}", path.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    /// Remove a stored upload that ended up unreferenced
    pub async fn discard(&self, kind: UploadKind, asset: &UploadedAsset) {
        let path = self.root.join(kind.subdir()).join(&asset.filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Discarded upload {}", path.display()),
            Err(e) => warn!("Failed to discard upload {}: {}", path.display(), e),
        }
    }

    async fn write_stream<S, E>(path: &Path, body: S) -> Result<u64, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<UploadError>,
    {
        let mut body = std::pin::pin!(body);
        let mut file = tokio::fs::File::create(path).await?;
        let mut size = 0u64;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(Into::<UploadError>::into)?;
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(size)
    }
}
