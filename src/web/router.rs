use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::AppConfig,
    services::{AuthService, ServiceContainer, UserService},
    web::{
        handlers::{auth_handlers, health_handlers, user_handlers},
        middleware::{auth_middleware, logging_middleware, request_id_middleware, require_admin},
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: ServiceContainer,
}

impl AppState {
    /// Create application state backed by the PostgreSQL repository
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let services = ServiceContainer::new(db_pool, &config.auth);
        Self {
            config: Arc::new(config),
            services,
        }
    }

    /// Create application state over pre-built services
    pub fn with_services(config: AppConfig, services: ServiceContainer) -> Self {
        Self {
            config: Arc::new(config),
            services,
        }
    }

    /// Get user service
    pub fn user_service(&self) -> Arc<dyn UserService> {
        self.services.user_service()
    }

    /// Get auth service
    pub fn auth_service(&self) -> Arc<dyn AuthService> {
        self.services.auth_service()
    }
}

/// Create the main application router with middleware stack
pub fn create_router(state: AppState) -> Router {
    let timeout = std::time::Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        .nest("/api/auth", create_auth_routes())
        .nest("/api/users", create_user_routes(&state))
        .nest("/health", create_health_routes())
        .layer(
            ServiceBuilder::new()
                // Correlation IDs first so every later layer can log them
                .layer(middleware::from_fn(request_id_middleware))
                .layer(middleware::from_fn(logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
        .fallback(not_found_handler)
}

/// Registration and login routes (public)
fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
}

/// User management routes
///
/// Everything here requires authentication; deletion additionally requires
/// the admin role. The role layer sits inside the auth layer so it always
/// runs against an attached identity.
fn create_user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(user_handlers::list_users))
        .route("/:id", get(user_handlers::get_user).put(user_handlers::update_user))
        .route(
            "/:id",
            delete(user_handlers::delete_user).layer(middleware::from_fn(require_admin)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Create health check routes
fn create_health_routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(health_handlers::liveness))
        .route("/ready", get(health_handlers::readiness))
        .route("/", get(health_handlers::health))
}

/// Fallback handler for 404 responses
pub async fn not_found_handler() -> impl IntoResponse {
    let error_response = json!({
        "error": "Not Found",
        "message": "The requested resource was not found",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::NOT_FOUND, Json(error_response))
}
