//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `NEWSSTAND_HOST` - Bind address (default: 127.0.0.1)
//! - `NEWSSTAND_PORT` - Listen port (default: 3000)
//! - `NEWSSTAND_UPSTREAM_URL` - Base URL of the remote content/auth API
//!   (default: the production API)
//! - `NEWSSTAND_DEMO_MODE` - Enable demo-session fallback for auth endpoints
//!   (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Production content/auth API, used when no override is provided.
const DEFAULT_UPSTREAM_URL: &str = "https://magstand-api.onrender.com/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Gateway application configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the remote content/auth API
    pub upstream_url: Url,
    /// Whether auth endpoints may degrade to a fabricated demo session
    pub demo_mode: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// Values are read once; there is no hot reload.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("NEWSSTAND_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("NEWSSTAND_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("NEWSSTAND_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("NEWSSTAND_PORT".to_string(), e.to_string()))?;
        let upstream_url = get_env_or_default("NEWSSTAND_UPSTREAM_URL", DEFAULT_UPSTREAM_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("NEWSSTAND_UPSTREAM_URL".to_string(), e.to_string())
            })?;
        let demo_mode = get_bool_env("NEWSSTAND_DEMO_MODE", false)?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            upstream_url,
            demo_mode,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean environment variable with a default value.
///
/// Accepts `true`/`false`/`1`/`0` (case-insensitive).
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => parse_bool(&raw)
            .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), format!("not a boolean: {raw}"))),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_default_upstream_url_is_valid() {
        let url = DEFAULT_UPSTREAM_URL.parse::<Url>().unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_unset_upstream_url_falls_back_to_default() {
        let value = get_env_or_default("NEWSSTAND_TEST_NEVER_SET", DEFAULT_UPSTREAM_URL);
        assert_eq!(value, DEFAULT_UPSTREAM_URL);
    }

    #[test]
    fn test_socket_addr() {
        let config = GatewayConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            upstream_url: DEFAULT_UPSTREAM_URL.parse().unwrap(),
            demo_mode: false,
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_from_env_invalid_port() {
        // SAFETY: this is the only test in the workspace touching this key,
        // and the key is restored before the test returns.
        unsafe { std::env::set_var("NEWSSTAND_PORT", "not-a-port") };
        let result = GatewayConfig::from_env();
        unsafe { std::env::remove_var("NEWSSTAND_PORT") };

        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "NEWSSTAND_PORT"));
    }
}
