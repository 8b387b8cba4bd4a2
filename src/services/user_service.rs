use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{UpdateUserRequest, User, UserId};
use crate::repository::{RepositoryError, UserRepository};
use crate::utils::validation::normalize_name;

/// Service error types
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("User not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

/// User management service trait
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<User, ServiceError>;
    async fn list_users(&self) -> Result<Vec<User>, ServiceError>;
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> Result<User, ServiceError>;
    async fn delete_user(&self, id: UserId) -> Result<(), ServiceError>;
}

/// User service implementation
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_user(&self, id: UserId) -> Result<User, ServiceError> {
        match self.repository.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(ServiceError::NotFound),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        let users = self.repository.list().await?;
        Ok(users)
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> Result<User, ServiceError> {
        let name = normalize_name(&request.name);
        if name.is_empty() {
            return Err(ServiceError::Validation("Name is required".to_string()));
        }

        let user = self.repository.update_name(id, &name).await?;
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ServiceError> {
        self.repository.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repository::MockUserRepository;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user(id: UserId) -> User {
        let now = Utc::now();
        User {
            id,
            name: "Test User".to_string(),
            email: "t@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_user_returns_user() {
        let id = Uuid::new_v4();
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_user(id))));

        let service = UserServiceImpl::new(Arc::new(repository));
        let user = service.get_user(id).await.unwrap();

        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn test_get_user_maps_missing_row_to_not_found() {
        let mut repository = MockUserRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = UserServiceImpl::new(Arc::new(repository));
        let result = service.get_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_user_rejects_empty_name_without_touching_store() {
        // No expectations set: any repository call would panic the test
        let repository = MockUserRepository::new();
        let service = UserServiceImpl::new(Arc::new(repository));

        let result = service
            .update_user(Uuid::new_v4(), UpdateUserRequest { name: "  ".to_string() })
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_user_trims_name() {
        let id = Uuid::new_v4();
        let mut repository = MockUserRepository::new();
        repository
            .expect_update_name()
            .withf(|_, name| name == "Renamed")
            .returning(move |id, name| {
                let mut user = sample_user(id);
                user.name = name.to_string();
                Ok(user)
            });

        let service = UserServiceImpl::new(Arc::new(repository));
        let user = service
            .update_user(id, UpdateUserRequest { name: "  Renamed ".to_string() })
            .await
            .unwrap();

        assert_eq!(user.name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_user_propagates_not_found() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_delete()
            .returning(|_| Err(RepositoryError::NotFound));

        let service = UserServiceImpl::new(Arc::new(repository));
        let result = service.delete_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_users_returns_all() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_list()
            .returning(|| Ok(vec![sample_user(Uuid::new_v4()), sample_user(Uuid::new_v4())]));

        let service = UserServiceImpl::new(Arc::new(repository));
        let users = service.list_users().await.unwrap();

        assert_eq!(users.len(), 2);
    }
}
