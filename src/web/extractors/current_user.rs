use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::error;

use crate::models::AuthenticatedUser;
use crate::web::responses::AppError;

/// Extractor for the authenticated identity attached by the auth middleware.
///
/// Only valid on routes behind `auth_middleware`; a missing identity means
/// the pipeline invariant was broken, which is an internal error rather than
/// an authentication failure.
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthenticatedUser>().copied().ok_or_else(|| {
            error!("Handler requested an identity on a route without authentication");
            AppError::Internal
        })
    }
}
