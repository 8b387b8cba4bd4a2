use super::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Duration;

/// Mock shutdown component for testing
struct MockShutdownComponent {
    name: String,
    shutdown_called: Arc<AtomicBool>,
    should_fail: bool,
    delay: Duration,
}

impl MockShutdownComponent {
    fn new(name: &str, shutdown_called: Arc<AtomicBool>, should_fail: bool, delay: Duration) -> Self {
        Self {
            name: name.to_string(),
            shutdown_called,
            should_fail,
            delay,
        }
    }
}

#[async_trait::async_trait]
impl ShutdownComponent for MockShutdownComponent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn shutdown(&mut self) -> Result<(), ShutdownError> {
        tokio::time::sleep(self.delay).await;

        self.shutdown_called.store(true, Ordering::SeqCst);

        if self.should_fail {
            Err(ShutdownError::HttpServer("Mock failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn test_graceful_shutdown_success() {
    let shutdown = GracefulShutdown::new(Duration::from_secs(5));

    let result = shutdown
        .execute_shutdown(|| async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(())
        })
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_graceful_shutdown_timeout() {
    let shutdown = GracefulShutdown::new(Duration::from_millis(100));

    let result = shutdown
        .execute_shutdown(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;

    assert!(matches!(result, Err(ShutdownError::Timeout)));
}

#[tokio::test]
async fn test_shutdown_coordinator_runs_all_components() {
    let mut coordinator = ShutdownCoordinator::new();

    let shutdown_called1 = Arc::new(AtomicBool::new(false));
    let shutdown_called2 = Arc::new(AtomicBool::new(false));

    coordinator.register(MockShutdownComponent::new(
        "test1",
        shutdown_called1.clone(),
        false,
        Duration::from_millis(50),
    ));
    coordinator.register(MockShutdownComponent::new(
        "test2",
        shutdown_called2.clone(),
        false,
        Duration::from_millis(50),
    ));

    let result = coordinator.shutdown_all().await;

    assert!(result.is_ok());
    assert!(shutdown_called1.load(Ordering::SeqCst));
    assert!(shutdown_called2.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_shutdown_coordinator_continues_past_failures() {
    let mut coordinator = ShutdownCoordinator::new();

    let shutdown_called1 = Arc::new(AtomicBool::new(false));
    let shutdown_called2 = Arc::new(AtomicBool::new(false));

    // Registered second, shuts down first, and fails
    coordinator.register(MockShutdownComponent::new(
        "test1",
        shutdown_called1.clone(),
        false,
        Duration::from_millis(50),
    ));
    coordinator.register(MockShutdownComponent::new(
        "test2",
        shutdown_called2.clone(),
        true,
        Duration::from_millis(50),
    ));

    let result = coordinator.shutdown_all().await;

    assert!(result.is_ok());
    assert!(shutdown_called1.load(Ordering::SeqCst));
    assert!(shutdown_called2.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_http_server_shutdown_consumes_handle() {
    let handle = axum_server::Handle::new();
    let mut component = HttpServerShutdown::new(handle).with_timeout(Duration::from_millis(100));

    assert!(component.shutdown().await.is_ok());
    // Second call finds the handle already consumed and still succeeds
    assert!(component.shutdown().await.is_ok());
}
