//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CHECKOUT_HOST` - Bind address (default: 127.0.0.1)
//! - `CHECKOUT_PORT` - Listen port (default: 3000)
//! - `CHECKOUT_BASE_URL` - Public URL (default: <http://127.0.0.1:3000>); HTTPS enables secure cookies
//! - `CHECKOUT_PROFILE_TYPE` - Profile type both widgets operate on (default: customer)
//! - `CHECKOUT_DEFAULT_COUNTRY` - Country pre-selected in new addresses
//! - `CHECKOUT_AVAILABLE_COUNTRIES` - Comma separated list of allowed countries
//! - `CHECKOUT_SEED_FILE` - JSON file with demo users and profiles
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use profile_select_core::CountryCode;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout application configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the checkout
    pub base_url: Url,
    /// Profile type of the billing and shipping widgets
    pub profile_type: String,
    /// Country pre-selected in new addresses
    pub default_country: Option<CountryCode>,
    /// Countries the address forms offer; empty means all
    pub available_countries: Vec<CountryCode>,
    /// Demo data loaded into the in-memory store at startup
    pub seed_file: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env
            .or_default("CHECKOUT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHECKOUT_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("CHECKOUT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHECKOUT_PORT".to_string(), e.to_string()))?;
        let base_url = env
            .or_default("CHECKOUT_BASE_URL", "http://127.0.0.1:3000")
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHECKOUT_BASE_URL".to_string(), e.to_string()))?;
        let profile_type = env.or_default("CHECKOUT_PROFILE_TYPE", "customer").trim().to_string();

        let default_country = env
            .optional("CHECKOUT_DEFAULT_COUNTRY")
            .map(|code| parse_country("CHECKOUT_DEFAULT_COUNTRY", &code))
            .transpose()?;
        let available_countries = env
            .optional("CHECKOUT_AVAILABLE_COUNTRIES")
            .map(|list| parse_country_list("CHECKOUT_AVAILABLE_COUNTRIES", &list))
            .transpose()?
            .unwrap_or_default();

        let seed_file = env.optional("CHECKOUT_SEED_FILE").map(PathBuf::from);

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            profile_type,
            default_country,
            available_countries,
            seed_file,
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

    /// Whether the checkout is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn parse_country(key: &str, code: &str) -> Result<CountryCode, ConfigError> {
    CountryCode::parse(code).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_country_list(key: &str, list: &str) -> Result<Vec<CountryCode>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| parse_country(key, code))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CheckoutConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CheckoutConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:3000/");
        assert_eq!(config.profile_type, "customer");
        assert!(config.default_country.is_none());
        assert!(config.available_countries.is_empty());
        assert!(config.seed_file.is_none());
        assert!(!config.is_secure());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_country_settings() {
        let config = load(&[
            ("CHECKOUT_DEFAULT_COUNTRY", "hu"),
            ("CHECKOUT_AVAILABLE_COUNTRIES", "US, FR,,HU"),
        ])
        .unwrap();
        assert_eq!(config.default_country.unwrap().as_str(), "HU");
        let codes: Vec<&str> = config.available_countries.iter().map(CountryCode::as_str).collect();
        assert_eq!(codes, vec!["US", "FR", "HU"]);
    }

    #[test]
    fn test_invalid_country_list() {
        let result = load(&[("CHECKOUT_AVAILABLE_COUNTRIES", "US,France")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "CHECKOUT_AVAILABLE_COUNTRIES"));
    }

    #[test]
    fn test_invalid_port() {
        let result = load(&[("CHECKOUT_PORT", "eighty")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "CHECKOUT_PORT"));
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = load(&[("CHECKOUT_BASE_URL", "https://checkout.example.com")]).unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_sentry_sample_rates() {
        let config = load(&[
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("SENTRY_SAMPLE_RATE", "0.5"),
            ("SENTRY_TRACES_SAMPLE_RATE", "not-a-number"),
        ])
        .unwrap();
        assert!(config.sentry_dsn.is_some());
        assert!((config.sentry_sample_rate - 0.5).abs() < f32::EPSILON);
        assert!((config.sentry_traces_sample_rate - 1.0).abs() < f32::EPSILON);
    }
}
