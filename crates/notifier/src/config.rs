//! Notifier configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NOTIFIER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `NOTIFIER_WEBHOOK_URL` - Seller-notification webhook
//!
//! ## Optional
//! - `NOTIFIER_TIMEOUT_SECS` - Webhook request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Notifier configuration.
#[derive(Clone)]
pub struct NotifierConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Webhook URLs often embed an access token
    pub webhook_url: Url,
    pub timeout: Duration,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("database_url", &"[REDACTED]")
            .field("webhook_url", &redacted_url(&self.webhook_url))
            .field("timeout", &self.timeout)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl NotifierConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("NOTIFIER_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("NOTIFIER_DATABASE_URL".to_string()))?;

        let raw_webhook = std::env::var("NOTIFIER_WEBHOOK_URL")
            .map_err(|_| ConfigError::MissingEnvVar("NOTIFIER_WEBHOOK_URL".to_string()))?;
        let webhook_url = parse_webhook_url(&raw_webhook)?;

        let timeout_secs = std::env::var("NOTIFIER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("NOTIFIER_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            database_url,
            webhook_url,
            timeout: Duration::from_secs(timeout_secs),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("NOTIFIER_WEBHOOK_URL".to_string(), msg);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

/// Scheme, host and port only, for logs.
#[must_use]
pub fn redacted_url(url: &Url) -> String {
    let mut shown = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        shown.push_str(&format!(":{port}"));
    }
    shown.push_str("/…");
    shown
}
