use serde::{Deserialize, Serialize};

use super::common::UserId;
use super::user::Role;

/// Login input
///
/// Fields default to empty strings so a missing field is reported with the
/// same response as an empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Login response carrying the issued token and nothing else
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// The verified identity attached to a request after authentication.
/// Lives only for the duration of the request.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
