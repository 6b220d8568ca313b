use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    /// `{"success": true, "data": ...}`
    Data,
    /// Object fields are lifted next to `"success"`
    Flatten,
}

/// Wrapper for API responses that automatically adds success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    envelope: Envelope,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
            envelope: Envelope::Data,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            data,
            status_code: Some(StatusCode::CREATED),
            envelope: Envelope::Data,
        }
    }

    /// Merge the fields of `data` into the envelope itself, e.g.
    /// `{"success": true, "token": ..., "user": ...}`
    pub fn flat(data: T) -> Self {
        Self {
            data,
            status_code: None,
            envelope: Envelope::Flatten,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // Convert data to JSON Value for consistent envelope format
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data",
                        "code": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = match (self.envelope, data_value) {
            (Envelope::Flatten, Value::Object(fields)) => {
                let mut envelope = Map::with_capacity(fields.len() + 1);
                envelope.insert("success".to_string(), Value::Bool(true));
                envelope.extend(fields);
                Value::Object(envelope)
            }
            (_, data_value) => json!({
                "success": true,
                "data": data_value
            }),
        };

        (status, Json(envelope)).into_response()
    }
}

// Convenience type aliases
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
