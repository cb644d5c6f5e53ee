//! Configuration module
//!
//! Environment-driven configuration for the API service. Payload ceilings
//! are consumed here as constants-with-overrides: the aggregate request
//! ceiling is enforced at the transport boundary before parsing, the
//! per-file metadata ceiling during admission.

use std::env;

use anyhow::{bail, Context};

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
/// Aggregate request-size ceiling, enforced before payload parsing.
const DEFAULT_MAX_REQUEST_BYTES: usize = 256 * 1024;
/// Per-file serialized-metadata ceiling, enforced during admission.
const DEFAULT_MAX_METADATA_BYTES_PER_FILE: usize = 64 * 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub max_request_bytes: usize,
    pub max_metadata_bytes_per_file: usize,
    /// Path to the ffprobe binary used for video container metadata.
    pub ffprobe_path: String,
    // Email notification (optional; notifications are skipped when absent)
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is required")?;

        let cors_origins = env_opt("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            cors_origins,
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)?,
            max_request_bytes: env_parse("MAX_REQUEST_BYTES", DEFAULT_MAX_REQUEST_BYTES)?,
            max_metadata_bytes_per_file: env_parse(
                "MAX_METADATA_BYTES_PER_FILE",
                DEFAULT_MAX_METADATA_BYTES_PER_FILE,
            )?,
            ffprobe_path: env_opt("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            smtp_host: env_opt("SMTP_HOST"),
            smtp_port: match env_opt("SMTP_PORT") {
                Some(raw) => Some(raw.parse().map_err(|e| anyhow::anyhow!("Invalid SMTP_PORT: {}", e))?),
                None => None,
            },
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASSWORD"),
            smtp_from: env_opt("SMTP_FROM"),
            smtp_tls: env_parse("SMTP_TLS", true)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            bail!("SERVER_PORT must be non-zero");
        }
        if self.max_request_bytes == 0 || self.max_metadata_bytes_per_file == 0 {
            bail!("payload ceilings must be non-zero");
        }
        if self.max_metadata_bytes_per_file > self.max_request_bytes {
            bail!("MAX_METADATA_BYTES_PER_FILE cannot exceed MAX_REQUEST_BYTES");
        }
        if self.smtp_host.is_some() && self.smtp_from.is_none() {
            bail!("SMTP_FROM is required when SMTP_HOST is set");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Whether enough SMTP settings are present to send notifications.
    pub fn email_configured(&self) -> bool {
        self.smtp_host.is_some() && self.smtp_from.is_some()
    }
}
