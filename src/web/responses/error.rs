use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::TokenError;
use crate::models::{ErrorResponse, ValidationErrorResponse};
use crate::services::{AuthError, ServiceError};

/// Application error type that can be converted to HTTP responses
///
/// Collaborator faults (store, hashing) deliberately map to an opaque 500
/// body; driver details go to tracing and Sentry only.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(&'static str),

    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(AuthError::ValidationFailed(errors)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorResponse::new(errors)),
                )
                    .into_response();
            }
            AppError::Auth(AuthError::MissingCredentials) => {
                (StatusCode::BAD_REQUEST, "Please enter all fields.".to_string())
            }
            AppError::Auth(AuthError::DuplicateEmail) => (
                StatusCode::BAD_REQUEST,
                "User with that email already exists".to_string(),
            ),
            AppError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::Auth(AuthError::Token(TokenError::Encoding(e))) => {
                tracing::error!("Token encoding failed: {:?}", e);
                sentry::capture_error(&e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Auth(AuthError::Token(_)) => {
                (StatusCode::UNAUTHORIZED, "Token is not valid".to_string())
            }
            AppError::Auth(AuthError::Hashing(e)) => {
                tracing::error!("Password hashing failed: {:?}", e);
                sentry::capture_error(&e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Auth(AuthError::Repository(e)) => {
                tracing::error!("Repository error: {:?}", e);
                sentry::capture_error(&e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Service(ServiceError::NotFound) => {
                (StatusCode::NOT_FOUND, "User not found".to_string())
            }
            AppError::Service(ServiceError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            AppError::Service(ServiceError::Repository(e)) => {
                tracing::error!("Repository error: {:?}", e);
                sentry::capture_error(&e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.to_string()),
            AppError::Internal => {
                tracing::error!("Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
