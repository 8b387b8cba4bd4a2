use anyhow::Result;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::settings::{AppConfig, LoggingConfig, SentryConfig};

/// Guards that must stay alive for the lifetime of the process: dropping the
/// appender guard flushes file logs, dropping the Sentry guard flushes
/// pending events.
pub struct TelemetryGuards {
    _sentry: Option<sentry::ClientInitGuard>,
    _appender: Option<WorkerGuard>,
}

/// Initialize tracing and Sentry from configuration
pub fn init_telemetry(config: &AppConfig) -> Result<TelemetryGuards> {
    let logging_config = &config.logging;
    let sentry_config = &config.sentry;

    let sentry_guard = init_sentry(sentry_config)?;

    let env_filter = create_env_filter(logging_config);

    let (writer, appender_guard) = create_writer(logging_config)?;

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(logging_config.include_location)
        .with_line_number(logging_config.include_location)
        .with_span_events(FmtSpan::CLOSE);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer());

    match logging_config.format.to_lowercase().as_str() {
        "pretty" => registry.with(fmt_layer.pretty()).init(),
        "compact" => registry.with(fmt_layer.compact()).init(),
        _ => registry.with(fmt_layer.json()).init(),
    }

    tracing::info!(
        "Telemetry initialized with level: {}, format: {}, target: {}, sentry_enabled: {}",
        logging_config.level,
        logging_config.format,
        logging_config.target,
        sentry_config.is_enabled()
    );

    Ok(TelemetryGuards {
        _sentry: sentry_guard,
        _appender: appender_guard,
    })
}

/// Initialize the Sentry SDK if a DSN is configured
fn init_sentry(config: &SentryConfig) -> Result<Option<sentry::ClientInitGuard>> {
    if !config.is_enabled() {
        return Ok(None);
    }

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(config.dsn.parse()?),
        environment: Some(config.environment.clone().into()),
        release: config.release.clone().map(Into::into),
        traces_sample_rate: config.traces_sample_rate,
        debug: config.debug,
        ..Default::default()
    });

    sentry::configure_scope(|scope| {
        scope.set_tag("service", "identity-api");
        scope.set_tag("version", env!("CARGO_PKG_VERSION"));
    });

    tracing::info!(
        "Sentry initialized with DSN: {}, environment: {}",
        mask_dsn(&config.dsn),
        config.environment
    );

    Ok(Some(guard))
}

/// Mask sensitive parts of a DSN for logging
fn mask_dsn(dsn: &str) -> String {
    if let Ok(parsed) = dsn.parse::<url::Url>() {
        format!("{}://***@{}", parsed.scheme(), parsed.host_str().unwrap_or("unknown"))
    } else {
        "***".to_string()
    }
}

/// Create the log level filter, honoring RUST_LOG when set
fn create_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Resolve the configured log target to a writer
fn create_writer(config: &LoggingConfig) -> Result<(BoxMakeWriter, Option<WorkerGuard>)> {
    match config.target.to_lowercase().as_str() {
        "stderr" => Ok((BoxMakeWriter::new(io::stderr), None)),
        "file" => {
            let file_path = config
                .file_path
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("File path is required when target is 'file'"))?;

            let path = std::path::Path::new(file_path);
            let directory = path
                .parent()
                .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", file_path))?;
            let filename = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid filename: {}", file_path))?;

            std::fs::create_dir_all(directory)?;

            let file_appender = tracing_appender::rolling::daily(directory, filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            Ok((BoxMakeWriter::new(non_blocking), Some(guard)))
        }
        _ => Ok((BoxMakeWriter::new(io::stdout), None)),
    }
}
