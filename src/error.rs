// HTTP API Error Types
use axum::{extract::multipart::MultipartError, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::database::{ContentError, DatabaseError};
use crate::schema::SchemaError;
use crate::services::upload_service::UploadError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest {
        message: String,
        code: &'static str,
    },
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound {
        message: String,
        code: &'static str,
    },

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message, .. } => message,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound { message, .. } => message,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { code, .. } => code,
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound { code, .. } => code,
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });

        if let ApiError::ValidationError {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            code: "BAD_REQUEST",
        }
    }

    pub fn missing_parameter(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            code: "MISSING_PARAMETER",
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            code: "INVALID_PARAMETER",
        }
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
            code: "NOT_FOUND",
        }
    }

    pub fn schema_not_found() -> Self {
        ApiError::NotFound {
            message: "Schema not found".to_string(),
            code: "SCHEMA_NOT_FOUND",
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::InvalidName(_) => ApiError::invalid_parameter("Invalid screen name"),
            SchemaError::InvalidVersion(_) => ApiError::invalid_parameter("Invalid version"),
            SchemaError::VersionNotFound(version) => ApiError::NotFound {
                message: format!("Version '{}' not found", version),
                code: "VERSION_NOT_FOUND",
            },
            // Missing, malformed and unreadable schemas look identical to clients
            other => {
                tracing::warn!("Schema lookup failed: {}", other);
                ApiError::schema_not_found()
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound { kind, id } => {
                ApiError::not_found(format!("{} {} not found", kind.label(), id))
            }
            ContentError::MissingField(field) => {
                let mut field_errors = HashMap::new();
                field_errors.insert(field.to_string(), "This field is required".to_string());
                ApiError::validation_error("Missing required fields", Some(field_errors))
            }
            ContentError::InvalidField { field, value } => {
                let mut field_errors = HashMap::new();
                field_errors.insert(field.to_string(), format!("Invalid value: {}", value));
                ApiError::validation_error("Invalid field format", Some(field_errors))
            }
            ContentError::Database(e) => e.into(),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidType(_) => ApiError::bad_request(
                "Invalid file type. Only jpg, jpeg, png, gif, webp allowed",
            ),
            UploadError::Io(e) => {
                tracing::error!("Failed to store upload: {}", e);
                ApiError::internal_server_error("Failed to save file")
            }
            UploadError::TooLarge => ApiError::payload_too_large("File too large"),
            UploadError::Interrupted(e) => {
                tracing::error!("Upload interrupted mid-write: {}", e);
                ApiError::internal_server_error("Failed to save file")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
            AuthError::MissingToken | AuthError::MalformedHeader => {
                ApiError::unauthorized("Authorization header required")
            }
            AuthError::InvalidToken(reason) => {
                tracing::debug!("Rejected token: {}", reason);
                ApiError::unauthorized("Invalid token")
            }
            AuthError::SessionNotFound => ApiError::unauthorized("Session expired or revoked"),
            AuthError::AdminRequired => ApiError::forbidden("Admin access required"),
            AuthError::UserNotFound => ApiError::not_found("User not found"),
            AuthError::TokenGeneration(msg) => {
                tracing::error!("Failed to generate token: {}", msg);
                ApiError::internal_server_error("Internal server error")
            }
            AuthError::PasswordHash(e) => {
                tracing::error!("Password verification error: {}", e);
                ApiError::internal_server_error("Internal server error")
            }
            AuthError::Database(e) => e.into(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("File too large")
        } else {
            tracing::debug!("Multipart parse error: {}", err.body_text());
            ApiError::bad_request("Invalid form data")
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn malformed_and_missing_schemas_render_the_same() {
        let missing: ApiError = SchemaError::NotFound(PathBuf::from("v1/home.json")).into();
        let malformed: ApiError = SchemaError::Malformed {
            path: PathBuf::from("v1/home.json"),
            reason: "expected value at line 1".to_string(),
        }
        .into();

        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_json(), malformed.to_json());
        assert_eq!(missing.to_json()["code"], "SCHEMA_NOT_FOUND");
        assert_eq!(missing.to_json()["error"], "Schema not found");
    }

    #[test]
    fn invalid_screen_name_is_a_bad_request() {
        let err: ApiError = SchemaError::InvalidName("../etc".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn envelope_carries_success_false() {
        let body = ApiError::missing_parameter("Screen parameter is required").to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "MISSING_PARAMETER");
        assert!(body.get("field_errors").is_none());
    }

    #[test]
    fn truncated_upload_is_an_internal_failure() {
        let interrupted: ApiError = UploadError::Interrupted("stream ended early".to_string()).into();
        let io: ApiError = UploadError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")).into();

        assert_eq!(interrupted.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(interrupted.to_json(), io.to_json());
        assert_eq!(interrupted.message(), "Failed to save file");

        let too_large: ApiError = UploadError::TooLarge.into();
        assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn admin_requirement_maps_to_forbidden() {
        let err: ApiError = AuthError::AdminRequired.into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
