// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (external service issues)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
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
        ApiError::BadRequest(message.into())
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

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        match err {
            crate::database::manager::DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            crate::database::manager::DatabaseError::ConfigMissing(name) => {
                tracing::error!("missing configuration: {}", name);
                ApiError::service_unavailable("Service is not configured")
            }
            crate::database::manager::DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("sqlx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::media::UploadError> for ApiError {
    fn from(err: crate::media::UploadError) -> Self {
        match err {
            crate::media::UploadError::NotConfigured => {
                ApiError::service_unavailable("Image uploads are not configured")
            }
            other => {
                tracing::error!("upload error: {}", other);
                ApiError::bad_gateway("File upload failed")
            }
        }
    }
}

impl From<crate::email::DeliveryError> for ApiError {
    fn from(err: crate::email::DeliveryError) -> Self {
        match err {
            crate::email::DeliveryError::NotConfigured => {
                ApiError::service_unavailable("Email service is not configured")
            }
            other => {
                tracing::error!("delivery error: {}", other);
                ApiError::bad_gateway("Failed to send message. Please try again later.")
            }
        }
    }
}

impl From<crate::workflows::WorkflowError> for ApiError {
    fn from(err: crate::workflows::WorkflowError) -> Self {
        match err {
            crate::workflows::WorkflowError::Validation {
                message,
                field_errors,
            } => ApiError::validation_error(message, Some(field_errors)),
            crate::workflows::WorkflowError::Conflict(msg) => ApiError::conflict(msg),
            crate::workflows::WorkflowError::NotFound(msg) => ApiError::not_found(msg),
            crate::workflows::WorkflowError::Upload(e) => e.into(),
            crate::workflows::WorkflowError::Delivery(e) => e.into(),
            crate::workflows::WorkflowError::Database(e) => e.into(),
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
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_detail() {
        let mut fields = HashMap::new();
        fields.insert("slug".to_string(), "Invalid slug format".to_string());
        let err = ApiError::validation_error("Invalid input", Some(fields));
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["slug"], "Invalid slug format");
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::conflict("x").status_code(), 409);
        assert_eq!(ApiError::bad_gateway("x").status_code(), 502);
    }
}
