use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::models::{NewUser, User, UserId};

/// Repository error types
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found")]
    NotFound,

    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),
}

/// Credential store interface. Email is the natural unique key; the backing
/// store enforces it with a uniqueness constraint, which also resolves
/// concurrent-registration races.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Update a user's name
    async fn update_name(&self, id: UserId, name: &str) -> Result<User, RepositoryError>;

    /// Delete a user
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;

    /// List all users ordered by creation time
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;
}

/// SQLx implementation of UserRepository
pub struct SqlxUserRepository {
    pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_email_key") {
                    warn!("Duplicate email rejected by constraint: {}", user.email);
                    return RepositoryError::DuplicateEmail(user.email.clone());
                }
            }
            warn!("Failed to create user: {}", e);
            RepositoryError::Database(e)
        })?;

        info!("Created user with ID: {}", created.id);
        Ok(created)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, name), fields(user_id = %id))]
    async fn update_name(&self, id: UserId, name: &str) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        info!("Updated user with ID: {}", id);
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("Deleted user with ID: {}", id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self, email))]
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }
}

/// In-memory repository used by service and router tests so scenarios run
/// without a live database. Mirrors the store contract, including the
/// uniqueness constraint on email.
#[cfg(test)]
pub mod test_support {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<Vec<User>>,
    }

    impl InMemoryUserRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();

            if users.iter().any(|u| u.email == user.email) {
                return Err(RepositoryError::DuplicateEmail(user.email.clone()));
            }

            let now = Utc::now();
            let created = User {
                id: Uuid::new_v4(),
                name: user.name.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                role: user.role,
                created_at: now,
                updated_at: now,
            };
            users.push(created.clone());
            Ok(created)
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn update_name(&self, id: UserId, name: &str) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(RepositoryError::NotFound)?;

            user.name = name.to_string();
            user.updated_at = Utc::now();
            Ok(user.clone())
        }

        async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.id != id);

            if users.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }

        async fn list(&self) -> Result<Vec<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.clone())
        }

        async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().any(|u| u.email == email))
        }
    }
}
