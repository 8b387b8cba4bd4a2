use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::settings::DatabaseConfig;

/// Database connection pool and related utilities
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing database connection pool");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .test_before_acquire(true)
            .connect(&config.url)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        info!(
            "Database connection pool initialized with {} max connections",
            config.max_connections
        );

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a clone of the connection pool
    pub fn pool_cloned(&self) -> PgPool {
        self.pool.clone()
    }

    /// Check database connectivity
    pub async fn health_check(&self) -> Result<DatabaseHealth, DatabaseError> {
        let start = std::time::Instant::now();

        let result = sqlx::query("SELECT 1 as health_check")
            .fetch_one(&self.pool)
            .await;

        let response_time = start.elapsed();

        match result {
            Ok(_) => Ok(DatabaseHealth {
                connected: true,
                response_time_ms: response_time.as_millis() as u64,
                active_connections: self.pool.size(),
                idle_connections: self.pool.num_idle() as u32,
            }),
            Err(e) => {
                warn!("Database health check failed: {}", e);
                Err(DatabaseError::HealthCheckFailed(e.to_string()))
            }
        }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        info!("Running database migrations");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Close the database connection pool gracefully
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// Get database connection statistics
    pub fn connection_stats(&self) -> ConnectionStats {
        ConnectionStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_connections: self.pool.options().get_max_connections(),
        }
    }
}

/// Database health information
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub response_time_ms: u64,
    pub active_connections: u32,
    pub idle_connections: u32,
}

/// Database connection statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConnectionStats {
    pub size: u32,
    pub idle: u32,
    pub max_connections: u32,
}

/// Database-related errors
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_health_serialization() {
        let health = DatabaseHealth {
            connected: true,
            response_time_ms: 50,
            active_connections: 3,
            idle_connections: 2,
        };

        let json = serde_json::to_string(&health).unwrap();
        assert!(json.contains("\"connected\":true"));
        assert!(json.contains("\"response_time_ms\":50"));
    }

    #[test]
    fn test_connection_stats_serialization() {
        let stats = ConnectionStats {
            size: 5,
            idle: 3,
            max_connections: 10,
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"size\":5"));
        assert!(json.contains("\"idle\":3"));
    }
}
