use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AuthConfig;
use crate::repository::{SqlxUserRepository, UserRepository};
use crate::services::{AuthService, AuthServiceImpl, UserService, UserServiceImpl};

/// Service container for dependency injection
///
/// Wires the repository into the service layer so the store handle is an
/// explicitly passed collaborator rather than a process-wide singleton.
#[derive(Clone)]
pub struct ServiceContainer {
    user_repository: Arc<dyn UserRepository>,
    user_service: Arc<dyn UserService>,
    auth_service: Arc<dyn AuthService>,
}

impl ServiceContainer {
    /// Create a container backed by the PostgreSQL repository
    pub fn new(db_pool: PgPool, auth_config: &AuthConfig) -> Self {
        let user_repository = Arc::new(SqlxUserRepository::new(db_pool));
        Self::with_repository(user_repository, auth_config)
    }

    /// Create a container over any repository implementation.
    /// Tests use this with an in-memory store.
    pub fn with_repository(
        user_repository: Arc<dyn UserRepository>,
        auth_config: &AuthConfig,
    ) -> Self {
        let user_service = Arc::new(UserServiceImpl::new(user_repository.clone()));
        let auth_service = Arc::new(AuthServiceImpl::new(user_repository.clone(), auth_config));

        Self {
            user_repository,
            user_service,
            auth_service,
        }
    }

    /// Get user service instance
    pub fn user_service(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    /// Get authentication service instance
    pub fn auth_service(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    /// Get user repository instance (for advanced use cases)
    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }
}
