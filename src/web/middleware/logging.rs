use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Middleware for logging HTTP requests and responses
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let correlation_id = request
        .extensions()
        .get::<String>()
        .cloned()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
    );

    async move {
        info!("Started processing request: {} {}", method, uri);

        let response = next.run(request).await;

        let duration_ms = start_time.elapsed().as_millis();
        let status = response.status();

        match status.as_u16() {
            200..=399 => {
                info!(
                    status = status.as_u16(),
                    duration_ms = duration_ms,
                    "Request completed"
                );
            }
            400..=499 => {
                warn!(
                    status = status.as_u16(),
                    duration_ms = duration_ms,
                    "Request completed with client error"
                );
            }
            _ => {
                error!(
                    status = status.as_u16(),
                    duration_ms = duration_ms,
                    "Request completed with server error"
                );
            }
        }

        response
    }
    .instrument(span)
    .await
}
