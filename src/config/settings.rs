use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use url::Url;

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid server configuration: {0}")]
    Server(String),
    #[error("Invalid database configuration: {0}")]
    Database(String),
    #[error("Invalid auth configuration: {0}")]
    Auth(String),
    #[error("Invalid logging configuration: {0}")]
    Logging(String),
    #[error("Invalid Sentry configuration: {0}")]
    Sentry(String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub sentry: SentryConfig,
    #[serde(default)]
    pub environment: String,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;
        self.sentry.validate()?;
        Ok(())
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "dev"
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production" || self.environment == "prod"
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
    #[serde(default = "default_graceful_shutdown_timeout")]
    pub graceful_shutdown_timeout_seconds: u64,
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.host.is_empty() {
            return Err(ConfigValidationError::Server("Host cannot be empty".to_string()));
        }

        if self.host != "localhost" && IpAddr::from_str(&self.host).is_err() {
            if self.host.contains(' ') || self.host.contains('\t') {
                return Err(ConfigValidationError::Server("Invalid host format".to_string()));
            }
        }

        if self.port == 0 {
            return Err(ConfigValidationError::Server("Port cannot be 0".to_string()));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError::Server("Timeout must be greater than 0".to_string()));
        }

        if self.graceful_shutdown_timeout_seconds == 0 {
            return Err(ConfigValidationError::Server(
                "Graceful shutdown timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        let ip = if self.host == "localhost" {
            IpAddr::from_str("127.0.0.1").unwrap()
        } else {
            IpAddr::from_str(&self.host).map_err(|_| {
                ConfigValidationError::Server(format!("Invalid IP address: {}", self.host))
            })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_graceful_shutdown_timeout() -> u64 {
    30
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.url.is_empty() {
            return Err(ConfigValidationError::Database("Database URL cannot be empty".to_string()));
        }

        Url::parse(&self.url)
            .map_err(|e| ConfigValidationError::Database(format!("Invalid database URL: {}", e)))?;

        if self.max_connections == 0 {
            return Err(ConfigValidationError::Database(
                "Max connections must be greater than 0".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigValidationError::Database(
                "Min connections cannot be greater than max connections".to_string(),
            ));
        }

        if self.acquire_timeout_seconds == 0 || self.idle_timeout_seconds == 0 {
            return Err(ConfigValidationError::Database(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Authentication configuration
///
/// The signing secret and token lifetime are always supplied from the
/// outside (file or environment); the service never generates either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    /// Validate auth configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // HS256 wants at least 32 bytes of key material
        if self.jwt_secret.len() < 32 {
            return Err(ConfigValidationError::Auth(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        if self.token_ttl_seconds == 0 {
            return Err(ConfigValidationError::Auth(
                "Token TTL must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Token lifetime as a duration
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_seconds as i64)
    }
}

fn default_token_ttl() -> u64 {
    3600
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub include_location: bool,
    #[serde(default = "default_log_target")]
    pub target: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigValidationError::Logging(format!(
                "Invalid log level '{}'. Valid levels: {}",
                self.level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["json", "pretty", "compact"];
        if !valid_formats.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigValidationError::Logging(format!(
                "Invalid log format '{}'. Valid formats: {}",
                self.format,
                valid_formats.join(", ")
            )));
        }

        let valid_targets = ["stdout", "stderr", "file"];
        if !valid_targets.contains(&self.target.to_lowercase().as_str()) {
            return Err(ConfigValidationError::Logging(format!(
                "Invalid log target '{}'. Valid targets: {}",
                self.target,
                valid_targets.join(", ")
            )));
        }

        if self.target.to_lowercase() == "file" && self.file_path.is_none() {
            return Err(ConfigValidationError::Logging(
                "File path must be provided when target is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_log_target() -> String {
    "stdout".to_string()
}

/// Sentry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentryConfig {
    pub dsn: String,
    pub environment: String,
    pub traces_sample_rate: f32,
    #[serde(default = "default_release")]
    pub release: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

impl SentryConfig {
    /// Validate Sentry configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Empty DSN disables Sentry; anything else must be a URL
        if !self.dsn.is_empty()
            && !self.dsn.starts_with("https://")
            && !self.dsn.starts_with("http://")
        {
            return Err(ConfigValidationError::Sentry(
                "DSN must be a valid URL starting with http:// or https://".to_string(),
            ));
        }

        if self.environment.is_empty() {
            return Err(ConfigValidationError::Sentry("Environment cannot be empty".to_string()));
        }

        if self.traces_sample_rate < 0.0 || self.traces_sample_rate > 1.0 {
            return Err(ConfigValidationError::Sentry(
                "Traces sample rate must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if Sentry is enabled (has a DSN)
    pub fn is_enabled(&self) -> bool {
        !self.dsn.is_empty()
    }
}

fn default_release() -> Option<String> {
    std::env::var("CARGO_PKG_VERSION").ok()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            timeout_seconds: 30,
            graceful_shutdown_timeout_seconds: default_graceful_shutdown_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/identity".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_seconds: default_token_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            include_location: false,
            target: default_log_target(),
            file_path: None,
        }
    }
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            environment: "development".to_string(),
            traces_sample_rate: 0.1,
            release: default_release(),
            debug: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
            sentry: SentryConfig::default(),
            environment: "development".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_requires_a_secret() {
        // The secret has no default on purpose
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigValidationError::Auth(_))));
    }

    #[test]
    fn test_config_with_secret_validates() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "test_secret_key_32_characters_long!".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "too-short".to_string();
        assert!(matches!(config.validate(), Err(ConfigValidationError::Auth(_))));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let mut auth = AuthConfig::default();
        auth.jwt_secret = "test_secret_key_32_characters_long!".to_string();
        auth.token_ttl_seconds = 0;
        assert!(auth.validate().is_err());
    }

    #[test]
    fn test_token_ttl_defaults_to_one_hour() {
        assert_eq!(AuthConfig::default().token_ttl(), chrono::Duration::seconds(3600));
    }

    #[test]
    fn test_socket_addr_resolves_localhost() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_environment_helpers() {
        let mut config = AppConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());

        config.environment = "production".to_string();
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let mut config = LoggingConfig::default();
        config.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}
