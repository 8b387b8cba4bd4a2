use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::models::{ApiResponse, AuthenticatedUser, UpdateUserRequest, User, UserId};
use crate::web::responses::AppError;
use crate::web::router::AppState;

/// List all users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state.user_service().list_users().await?;

    Ok(Json(ApiResponse::new(users)))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.user_service().get_user(user_id).await?;

    Ok(Json(ApiResponse::new(user)))
}

/// Update a user's name
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    identity: AuthenticatedUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.user_service().update_user(user_id, request).await?;
    tracing::info!("User {} updated user {}", identity.id, user_id);

    Ok(Json(ApiResponse::with_message(user, "User updated successfully".to_string())))
}

/// Delete a user (admin only, enforced by the role middleware)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    identity: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    state.user_service().delete_user(user_id).await?;
    tracing::info!("Admin {} deleted user {}", identity.id, user_id);

    Ok(StatusCode::NO_CONTENT)
}
