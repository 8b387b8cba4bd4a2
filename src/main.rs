use std::time::Duration;

use anyhow::Result;
use identity_api::{
    config::AppConfig,
    database::Database,
    shutdown::{
        DatabaseShutdown, GracefulShutdown, HttpServerShutdown, ShutdownCoordinator,
        TracingShutdown,
    },
    tracing as telemetry,
    web::router::{create_router, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let guards = telemetry::init_telemetry(&config)?;

    tracing::info!("Configuration loaded and telemetry initialized");

    let database = Database::new(&config.database).await?;
    database.migrate().await?;

    let health = database.health_check().await?;
    tracing::info!(
        "Database reachable in {}ms ({} active connections)",
        health.response_time_ms,
        health.active_connections
    );

    let addr = config.server.socket_addr()?;
    let graceful_timeout = Duration::from_secs(config.server.graceful_shutdown_timeout_seconds);

    let state = AppState::new(config, database.pool_cloned());
    let router = create_router(state);

    let handle = axum_server::Handle::new();
    let server_handle = handle.clone();
    let server_task = tokio::spawn(async move {
        if let Err(e) = axum_server::bind(addr)
            .handle(server_handle)
            .serve(router.into_make_service())
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    match handle.listening().await {
        Some(bound) => tracing::info!("Server listening on {}", bound),
        None => anyhow::bail!("Server failed to bind {}", addr),
    }

    let shutdown = GracefulShutdown::new(graceful_timeout);
    shutdown.wait_for_shutdown_signal().await;

    let mut coordinator = ShutdownCoordinator::new();
    coordinator.register(TracingShutdown::new(guards));
    coordinator.register(DatabaseShutdown::new(database).with_timeout(graceful_timeout));
    coordinator.register(HttpServerShutdown::new(handle).with_timeout(graceful_timeout));

    shutdown
        .execute_shutdown(|| async move { coordinator.shutdown_all().await })
        .await?;

    let _ = server_task.await;

    Ok(())
}
