//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROSTER_HOST` - Bind address (default: 127.0.0.1)
//! - `ROSTER_PORT` - Listen port (default: 3000)
//! - `ROSTER_API_BASE_URL` - Remote user source (default: <https://jsonplaceholder.typicode.com>)
//! - `ROSTER_API_TIMEOUT_SECS` - Per-request timeout for remote calls (default: 10)
//! - `ROSTER_SIMULATE_REMOTE_ADD` - Send added users to `POST /users` before
//!   storing them locally (default: true)
//! - `ROSTER_LOG_JSON` - Emit JSON logs instead of text when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default remote user source.
pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote user source configuration
    pub placeholder: PlaceholderConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Remote user source configuration.
#[derive(Debug, Clone)]
pub struct PlaceholderConfig {
    /// Base URL; `/users` is appended to it
    pub base_url: Url,
    /// Timeout applied to every remote request
    pub timeout: Duration,
    /// Echo additions to `POST /users` before storing them
    pub simulate_remote_add: bool,
}

impl PlaceholderConfig {
    /// Configuration pointing at `base_url` with default timeout and the
    /// remote echo enabled.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            simulate_remote_add: true,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default::<IpAddr>(&var, "ROSTER_HOST", "127.0.0.1")?;
        let port = parse_or_default::<u16>(&var, "ROSTER_PORT", "3000")?;
        let placeholder = PlaceholderConfig::from_vars(&var)?;
        let log_json = var("ROSTER_LOG_JSON").is_some_and(|v| is_truthy(&v));

        let sentry_dsn = var("SENTRY_DSN").filter(|v| !v.is_empty());
        let sentry_environment = var("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = var("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = var("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            placeholder,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PlaceholderConfig {
    fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = var("ROSTER_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ROSTER_API_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "ROSTER_API_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let timeout_secs = parse_or_default::<u64>(
            var,
            "ROSTER_API_TIMEOUT_SECS",
            &DEFAULT_API_TIMEOUT_SECS.to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ROSTER_API_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let simulate_remote_add = match var("ROSTER_SIMULATE_REMOTE_ADD") {
            None => true,
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "ROSTER_SIMULATE_REMOTE_ADD".to_string(),
                    format!("expected true or false, got '{value}'"),
                )
            })?,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            simulate_remote_add,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or_default<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn is_truthy(value: &str) -> bool {
    parse_bool(value).unwrap_or(!value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DashboardConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        DashboardConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.placeholder.base_url.as_str(),
            "https://jsonplaceholder.typicode.com/"
        );
        assert_eq!(config.placeholder.timeout, Duration::from_secs(10));
        assert!(config.placeholder.simulate_remote_add);
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ROSTER_HOST", "0.0.0.0"),
            ("ROSTER_PORT", "8080"),
            ("ROSTER_API_BASE_URL", "http://localhost:9000/api"),
            ("ROSTER_API_TIMEOUT_SECS", "3"),
            ("ROSTER_SIMULATE_REMOTE_ADD", "off"),
            ("ROSTER_LOG_JSON", "1"),
            ("SENTRY_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.placeholder.base_url.as_str(), "http://localhost:9000/api");
        assert_eq!(config.placeholder.timeout, Duration::from_secs(3));
        assert!(!config.placeholder.simulate_remote_add);
        assert!(config.log_json);
        assert!((config.sentry_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("ROSTER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ROSTER_PORT"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(config_from(&[("ROSTER_API_BASE_URL", "not a url")]).is_err());
        assert!(config_from(&[("ROSTER_API_BASE_URL", "ftp://example.com")]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(config_from(&[("ROSTER_API_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_invalid_simulate_flag() {
        let err = config_from(&[("ROSTER_SIMULATE_REMOTE_ADD", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("ROSTER_SIMULATE_REMOTE_ADD"));
    }

    #[test]
    fn test_empty_sentry_dsn_is_disabled() {
        let config = config_from(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
