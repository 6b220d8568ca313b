pub mod auth_service;
pub mod upload_service;

pub use auth_service::{AuthService, LoginOutcome};
pub use upload_service::{ImageStore, UploadError, UploadKind, UploadedAsset};
