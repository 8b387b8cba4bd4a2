use axum::{extract::State, http::StatusCode, response::Json};

use crate::models::{ApiResponse, LoginRequest, LoginResponse, RegisterRequest, User};
use crate::web::responses::AppError;
use crate::web::router::AppState;

/// Register a new user
///
/// Responds 201 with the created record; the password hash never appears in
/// the body.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = state.auth_service().register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user, "User registered successfully".to_string())),
    ))
}

/// Log a user in, returning a fresh bearer token and nothing else
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = state.auth_service().login(request).await?;

    Ok(Json(ApiResponse::new(response)))
}
