//! Configuration management for Pressroom
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values
//!
//! The bare `UPLOAD_DIR` variable overrides `media.upload_dir`.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides the upload storage root
pub const UPLOAD_DIR_ENV: &str = "UPLOAD_DIR";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Media storage configuration
    #[serde(default)]
    pub media: MediaConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum JSON body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Create missing tables on startup
    #[serde(default = "default_enabled")]
    pub auto_migrate: bool,

    /// Log every statement through sqlx
    #[serde(default)]
    pub sqlx_logging: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Directory uploads are written into (bucketed by year/month)
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Directory served as static content
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,

    /// URL prefix the static root is served under
    #[serde(default = "default_static_url_prefix")]
    pub static_url_prefix: String,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HMAC secret used to verify bearer tokens
    pub jwt_secret: Option<String>,

    /// Lifetime of tokens minted by this service, in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log filter directive (debug, info, warn, error, or an EnvFilter string)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Expose Prometheus metrics on /metrics
    #[serde(default = "default_enabled")]
    pub metrics_enabled: bool,

    /// Service name for log records
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_request_timeout() -> u64 { 30 }
fn default_body_limit() -> usize { 2 * 1024 * 1024 }
fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_upload_dir() -> PathBuf { PathBuf::from("static/uploads") }
fn default_static_root() -> PathBuf { PathBuf::from("static") }
fn default_static_url_prefix() -> String { "/static/".to_string() }
fn default_max_upload() -> usize { 25 * 1024 * 1024 }
fn default_jwt_expiration() -> u64 { 3600 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "pressroom".to_string() }
fn default_enabled() -> bool { true }

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            static_root: default_static_root(),
            static_url_prefix: default_static_url_prefix(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiration_secs: default_jwt_expiration(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_enabled: default_enabled(),
            service_name: default_service_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("database.url", "postgres://localhost/pressroom")?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.apply_upload_dir_override(std::env::var(UPLOAD_DIR_ENV).ok());
        Ok(config)
    }

    /// Replace the upload root when `UPLOAD_DIR` is set and non-empty
    pub fn apply_upload_dir_override(&mut self, upload_dir: Option<String>) {
        if let Some(dir) = upload_dir.filter(|d| !d.trim().is_empty()) {
            self.media.upload_dir = PathBuf::from(dir);
        }
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
                body_limit_bytes: default_body_limit(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/pressroom".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
                auto_migrate: default_enabled(),
                sqlx_logging: false,
            },
            media: MediaConfig::default(),
            auth: AuthConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.media.static_url_prefix, "/static/");
        assert_eq!(config.media.upload_dir, PathBuf::from("static/uploads"));
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_upload_dir_override() {
        let mut config = AppConfig::default();
        config.apply_upload_dir_override(Some("/srv/uploads".to_string()));
        assert_eq!(config.media.upload_dir, PathBuf::from("/srv/uploads"));
    }

    #[test]
    fn test_blank_upload_dir_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_upload_dir_override(Some("  ".to_string()));
        config.apply_upload_dir_override(None);
        assert_eq!(config.media.upload_dir, PathBuf::from("static/uploads"));
    }

    #[test]
    fn test_request_timeout() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
