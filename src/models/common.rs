use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Common ID types
pub type UserId = Uuid;

/// Common response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_message(data: T, message: String) -> Self {
        Self {
            data,
            message: Some(message),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Common error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response carrying the full list of field violations
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ValidationErrorResponse {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            timestamp: chrono::Utc::now(),
        }
    }
}
