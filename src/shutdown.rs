use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// Graceful shutdown handler that listens for termination signals
/// and coordinates the shutdown sequence
pub struct GracefulShutdown {
    shutdown_timeout: Duration,
}

impl GracefulShutdown {
    /// Create a new graceful shutdown handler with the specified timeout
    pub fn new(shutdown_timeout: Duration) -> Self {
        Self { shutdown_timeout }
    }

    /// Wait for termination signals (SIGTERM, SIGINT, or Ctrl+C)
    pub async fn wait_for_shutdown_signal(&self) {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
            }
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown");
            }
        }
    }

    /// Execute the graceful shutdown sequence with timeout
    pub async fn execute_shutdown<F, Fut>(&self, shutdown_fn: F) -> Result<(), ShutdownError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<(), ShutdownError>>,
    {
        info!(
            "Starting graceful shutdown sequence with timeout of {:?}",
            self.shutdown_timeout
        );

        match tokio::time::timeout(self.shutdown_timeout, shutdown_fn()).await {
            Ok(Ok(())) => {
                info!("Graceful shutdown completed successfully");
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Error during graceful shutdown: {}", e);
                Err(e)
            }
            Err(_) => {
                warn!(
                    "Graceful shutdown timed out after {:?}, forcing exit",
                    self.shutdown_timeout
                );
                Err(ShutdownError::Timeout)
            }
        }
    }
}

/// Errors that can occur during shutdown
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("Shutdown timed out")]
    Timeout,

    #[error("Database shutdown error: {0}")]
    Database(String),

    #[error("HTTP server shutdown error: {0}")]
    HttpServer(String),
}

/// Shutdown coordinator that manages the shutdown sequence for all
/// application components
pub struct ShutdownCoordinator {
    components: Vec<Box<dyn ShutdownComponent>>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Register a component for shutdown
    pub fn register<T: ShutdownComponent + 'static>(&mut self, component: T) {
        self.components.push(Box::new(component));
    }

    /// Execute shutdown for all registered components in reverse
    /// registration order (LIFO). A failing component does not stop the rest.
    pub async fn shutdown_all(&mut self) -> Result<(), ShutdownError> {
        info!("Shutting down {} components", self.components.len());

        for component in self.components.iter_mut().rev() {
            let component_name = component.name().to_string();
            info!("Shutting down component: {}", component_name);

            match component.shutdown().await {
                Ok(()) => {
                    info!("Component '{}' shut down successfully", component_name);
                }
                Err(e) => {
                    error!("Failed to shutdown component '{}': {}", component_name, e);
                }
            }
        }

        info!("All components shutdown sequence completed");
        Ok(())
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for components that need to be shut down gracefully
#[async_trait::async_trait]
pub trait ShutdownComponent: Send + Sync {
    /// Get the name of this component for logging
    fn name(&self) -> &str;

    /// Shutdown this component gracefully
    async fn shutdown(&mut self) -> Result<(), ShutdownError>;
}

/// HTTP server shutdown component
pub struct HttpServerShutdown {
    server_handle: Option<axum_server::Handle>,
    drain_timeout: Duration,
}

impl HttpServerShutdown {
    pub fn new(server_handle: axum_server::Handle) -> Self {
        Self {
            server_handle: Some(server_handle),
            drain_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl ShutdownComponent for HttpServerShutdown {
    fn name(&self) -> &str {
        "HTTP Server"
    }

    async fn shutdown(&mut self) -> Result<(), ShutdownError> {
        if let Some(handle) = self.server_handle.take() {
            info!(
                "Initiating HTTP server graceful shutdown with drain timeout of {:?}",
                self.drain_timeout
            );

            // Stop accepting new connections and drain in-flight requests
            handle.graceful_shutdown(Some(self.drain_timeout));

            info!("HTTP server graceful shutdown initiated");
            Ok(())
        } else {
            warn!("HTTP server handle already consumed or not available");
            Ok(())
        }
    }
}

/// Database connection pool shutdown component
pub struct DatabaseShutdown {
    database: Option<crate::database::Database>,
    close_timeout: Duration,
}

impl DatabaseShutdown {
    pub fn new(database: crate::database::Database) -> Self {
        Self {
            database: Some(database),
            close_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl ShutdownComponent for DatabaseShutdown {
    fn name(&self) -> &str {
        "Database Connection Pool"
    }

    async fn shutdown(&mut self) -> Result<(), ShutdownError> {
        if let Some(database) = self.database.take() {
            info!(
                "Closing database connection pool with timeout of {:?}",
                self.close_timeout
            );

            let close_result = tokio::time::timeout(self.close_timeout, async {
                let stats = database.connection_stats();
                info!(
                    "Database connection stats before close: active={}, idle={}, max={}",
                    stats.size, stats.idle, stats.max_connections
                );

                database.close().await;
            })
            .await;

            match close_result {
                Ok(()) => {
                    info!("Database connection pool closed successfully");
                    Ok(())
                }
                Err(_) => {
                    warn!(
                        "Database close timed out after {:?}, connections may not be properly closed",
                        self.close_timeout
                    );
                    Err(ShutdownError::Database("Close timeout".to_string()))
                }
            }
        } else {
            warn!("Database already closed or not available");
            Ok(())
        }
    }
}

/// Tracing and logging shutdown component
pub struct TracingShutdown {
    guards: Option<crate::tracing::TelemetryGuards>,
}

impl TracingShutdown {
    pub fn new(guards: crate::tracing::TelemetryGuards) -> Self {
        Self {
            guards: Some(guards),
        }
    }
}

#[async_trait::async_trait]
impl ShutdownComponent for TracingShutdown {
    fn name(&self) -> &str {
        "Tracing and Logging"
    }

    async fn shutdown(&mut self) -> Result<(), ShutdownError> {
        if let Some(guards) = self.guards.take() {
            // Dropping the guards flushes file logs and pending Sentry events
            drop(guards);
            info!("Telemetry guards released");
        } else {
            warn!("Telemetry guards already consumed or not available");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
