use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};

use crate::models::AuthenticatedUser;
use crate::web::responses::AppError;
use crate::web::router::AppState;

/// Authentication middleware
///
/// Runs the pipeline stages strictly in order: header extraction, scheme
/// split, token verification, identity attachment. Any rejection
/// short-circuits the request; downstream handlers never run. Verification
/// failures all produce the same message — the caller learns nothing about
/// why a token was refused.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => value,
        None => {
            warn!("Request rejected: no authorization header");
            return Err(AppError::Unauthenticated("No token, authorization denied"));
        }
    };

    let token = match header_value.to_str().ok().and_then(bearer_token) {
        Some(token) => token.to_owned(),
        None => {
            warn!("Request rejected: authorization header is not a bearer token");
            return Err(AppError::Unauthenticated(
                "Token format is incorrect, authorization denied",
            ));
        }
    };

    let identity = match state.auth_service().validate_token(&token).await {
        Ok(identity) => identity,
        Err(e) => {
            debug!("Token verification failed: {}", e);
            return Err(AppError::Unauthenticated("Token is not valid"));
        }
    };

    // Downstream handlers and the role check read the identity from here
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Role check middleware for admin-only routes
///
/// Composable and opt-in per route; must be layered inside
/// `auth_middleware`. Running without an attached identity breaks the
/// pipeline invariant and is reported as an internal error, not as 401.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let identity = match request.extensions().get::<AuthenticatedUser>().copied() {
        Some(identity) => identity,
        None => {
            error!("Role check ran without an authenticated identity");
            return Err(AppError::Internal);
        }
    };

    if !identity.is_admin() {
        warn!("Admin-only action denied for user {}", identity.id);
        return Err(AppError::Forbidden("Forbidden: Admins only"));
    }

    Ok(next.run(request).await)
}

/// Extract the token part of a "Bearer <token>" header value
fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
