use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::auth::{PasswordHashError, PasswordHasher, TokenError, TokenService};
use crate::config::AuthConfig;
use crate::models::{
    AuthenticatedUser, FieldError, LoginRequest, LoginResponse, NewUser, RegisterRequest, Role,
    User,
};
use crate::repository::{RepositoryError, UserRepository};
use crate::utils::validation::{normalize_email, normalize_name, validate_registration};

/// Authentication error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    #[error("User with that email already exists")]
    DuplicateEmail,

    #[error("Please enter all fields.")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Hashing(#[from] PasswordHashError),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

// A duplicate insert that slips past the pre-check surfaces as the store's
// constraint violation; it maps to the same business error either way.
impl From<RepositoryError> for AuthError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::DuplicateEmail(_) => AuthError::DuplicateEmail,
            other => AuthError::Repository(other),
        }
    }
}

/// Authentication service trait
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<User, AuthError>;
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError>;
    async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Authentication service implementation
pub struct AuthServiceImpl {
    repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            repository,
            hasher: PasswordHasher::new(),
            tokens: TokenService::new(&config.jwt_secret, config.token_ttl()),
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let errors = validate_registration(&request);
        if !errors.is_empty() {
            return Err(AuthError::ValidationFailed(errors));
        }

        let name = normalize_name(&request.name);
        let email = normalize_email(&request.email);

        if self.repository.email_exists(&email).await? {
            debug!("Registration rejected: email already exists");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let new_user = NewUser {
            name,
            email,
            password_hash,
            role: Role::default(),
        };

        let user = self.repository.create(&new_user).await?;
        info!("Registered user with ID: {}", user.id);
        Ok(user)
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let email = normalize_email(&request.email);

        // Unknown email and wrong password take the same exit so a caller
        // cannot probe which emails are registered.
        let user = match self.repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("Login failed: email not registered");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(&request.password, &user.password_hash) {
            debug!("Login failed: password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, user.role)?;
        info!("Issued token for user {}", user.id);
        Ok(LoginResponse { token })
    }

    async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.tokens.verify(token)?;

        Ok(AuthenticatedUser {
            id: claims.user.id,
            role: claims.user.role,
        })
    }
}
