//! Platform configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLATFORM_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `PLATFORM_BASE_URL` - Public URL for the platform API
//! - `VERCEL_API_TOKEN` - Hosting-provider API token (domain management)
//! - `VERCEL_PROJECT_ID` - Hosting-provider project the custom domains attach to
//! - `CRON_SECRET` - Shared secret for the scheduled domain-refresh endpoint
//! - `ADMIN_API_TOKEN` - Shared secret for the admin console surface
//!
//! ## Optional
//! - `PLATFORM_HOST` - Bind address (default: 127.0.0.1)
//! - `PLATFORM_PORT` - Listen port (default: 3002)
//! - `VERCEL_TEAM_ID` - Hosting-provider team scope
//! - `ENTITLEMENT_SOURCE` - `subscriptions` (default) or `static`
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` / `SENTRY_SAMPLE_RATE` /
//!   `SENTRY_TRACES_SAMPLE_RATE` - Error tracking

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which backend resolves store entitlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntitlementSource {
    /// Authoritative: join the most recent subscription to its plan row.
    #[default]
    Subscriptions,
    /// Fallback deployment mode: a hardcoded plan-name table.
    Static,
}

impl std::str::FromStr for EntitlementSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscriptions" => Ok(Self::Subscriptions),
            "static" => Ok(Self::Static),
            _ => Err(format!("invalid entitlement source: {s}")),
        }
    }
}

/// Platform application configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the platform API
    pub base_url: String,
    /// Hosting-provider (Vercel) domain API configuration
    pub vercel: VercelConfig,
    /// Shared secret authorizing the scheduled domain-refresh endpoint
    pub cron_secret: SecretString,
    /// Shared secret authorizing the admin console surface
    pub admin_api_token: SecretString,
    /// Which backend resolves entitlements
    pub entitlement_source: EntitlementSource,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Hosting-provider (Vercel) domain API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct VercelConfig {
    /// API token (full project access)
    pub api_token: SecretString,
    /// Project the custom domains attach to
    pub project_id: String,
    /// Optional team scope
    pub team_id: Option<String>,
}

impl std::fmt::Debug for VercelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VercelConfig")
            .field("api_token", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("team_id", &self.team_id)
            .finish()
    }
}

impl VercelConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_token: get_validated_secret("VERCEL_API_TOKEN")?,
            project_id: get_required_env("VERCEL_PROJECT_ID")?,
            team_id: get_optional_env("VERCEL_TEAM_ID"),
        })
    }
}

impl PlatformConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PLATFORM_DATABASE_URL")?;
        let host = get_env_or_default("PLATFORM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLATFORM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PLATFORM_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLATFORM_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("PLATFORM_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("PLATFORM_BASE_URL".to_string(), e.to_string())
        })?;

        let vercel = VercelConfig::from_env()?;
        let cron_secret = get_validated_secret("CRON_SECRET")?;
        let admin_api_token = get_validated_secret("ADMIN_API_TOKEN")?;

        let entitlement_source = get_env_or_default("ENTITLEMENT_SOURCE", "subscriptions")
            .parse::<EntitlementSource>()
            .map_err(|e| ConfigError::InvalidEnvVar("ENTITLEMENT_SOURCE".to_string(), e))?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            vercel,
            cron_secret,
            admin_api_token,
            entitlement_source,
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

    /// Check a presented cron shared secret.
    #[must_use]
    pub fn cron_secret_matches(&self, candidate: &str) -> bool {
        self.cron_secret.expose_secret() == candidate
    }

    /// Check a presented admin console token.
    #[must_use]
    pub fn admin_token_matches(&self, candidate: &str) -> bool {
        self.admin_api_token.expose_secret() == candidate
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by managed-postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_entitlement_source_parse() {
        assert_eq!(
            "subscriptions".parse::<EntitlementSource>().unwrap(),
            EntitlementSource::Subscriptions
        );
        assert_eq!(
            "static".parse::<EntitlementSource>().unwrap(),
            EntitlementSource::Static
        );
        assert!("remote".parse::<EntitlementSource>().is_err());
    }

    #[test]
    fn test_vercel_config_debug_redacts_token() {
        let config = VercelConfig {
            api_token: SecretString::from("vc_tok_9aK3xQ71mPz4"),
            project_id: "prj_abc123".to_string(),
            team_id: None,
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("prj_abc123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("vc_tok_9aK3xQ71mPz4"));
    }

    #[test]
    fn test_socket_addr() {
        let config = PlatformConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            base_url: "http://localhost:3002".to_string(),
            vercel: VercelConfig {
                api_token: SecretString::from("tok"),
                project_id: "prj_test".to_string(),
                team_id: None,
            },
            cron_secret: SecretString::from("cron"),
            admin_api_token: SecretString::from("admin"),
            entitlement_source: EntitlementSource::Subscriptions,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }
}
