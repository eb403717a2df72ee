//! Configuration management for the Bookshelf server

use chrono::Duration;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Longest accepted token lifetime (one year)
pub const MAX_JWT_EXPIRATION_SECS: u64 = 365 * 24 * 3600;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    /// Grace period given to in-flight requests once shutdown starts
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret. When unset or empty a random secret is generated per process,
    /// so issued tokens do not survive a restart.
    pub jwt_secret: Option<String>,
    pub jwt_expiration_secs: u64,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Optional base file, defaults cover everything it could set
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (BOOKSHELF_SERVER__PORT, BOOKSHELF_AUTH__JWT_SECRET, ...)
            .add_source(
                Environment::with_prefix("BOOKSHELF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Flat PORT variable overrides the listening port
            .set_override_option("server.port", env::var("PORT").ok())?
            // Flat JWT_SECRET variable overrides the signing secret
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.auth.jwt_expiration()?;
        Ok(config)
    }
}

impl AuthConfig {
    /// Token lifetime. Zero or more than [`MAX_JWT_EXPIRATION_SECS`] is rejected.
    pub fn jwt_expiration(&self) -> Result<Duration, ConfigError> {
        let secs = self.jwt_expiration_secs;
        if secs == 0 || secs > MAX_JWT_EXPIRATION_SECS {
            return Err(ConfigError::Message(format!(
                "auth.jwt_expiration_secs must be between 1 and {}, got {}",
                MAX_JWT_EXPIRATION_SECS, secs
            )));
        }
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                ConfigError::Message(format!("auth.jwt_expiration_secs out of range: {}", secs))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_enabled: true,
            shutdown_timeout_secs: 5,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiration_secs: 3600,
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
