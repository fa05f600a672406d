//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `JWT_SECRET` - Bearer token signing secret (min 32 chars, high entropy)
//! - `GOOGLE_CLIENT_ID` - Google OAuth web client ID (accepted token audience)
//!
//! ## Optional
//! - `BIGEAR_HOST` - Bind address (default: 127.0.0.1)
//! - `BIGEAR_PORT` - Listen port (default: 8080)
//! - `JWT_EXPIRY_HOURS` - Bearer token lifetime in hours (default: 24)
//! - `GOOGLE_ANDROID_CLIENT_ID` - Additional accepted audience for tokens
//!   minted by the native client (defaults to the web client ID)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
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

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token signing secret
    pub jwt_secret: SecretString,
    /// Bearer token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Google sign-in configuration
    pub google: GoogleAuthConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Google sign-in (federated identity) configuration.
#[derive(Debug, Clone)]
pub struct GoogleAuthConfig {
    /// OAuth client ID for the web client
    pub client_id: String,
    /// OAuth client ID for the Android client, when it differs from the web one
    pub android_client_id: Option<String>,
}

impl GoogleAuthConfig {
    /// The set of audiences an ID token may carry.
    ///
    /// Always contains the web client ID; the Android client ID is included
    /// when configured and distinct.
    #[must_use]
    pub fn audiences(&self) -> Vec<String> {
        let mut audiences = vec![self.client_id.clone()];
        if let Some(android) = &self.android_client_id
            && android != &self.client_id
        {
            audiences.push(android.clone());
        }
        audiences
    }
}

impl ServerConfig {
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

        let database_url = get_required_secret("DATABASE_URL")?;
        let host = get_env_or_default("BIGEAR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BIGEAR_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BIGEAR_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BIGEAR_PORT".to_string(), e.to_string()))?;

        let jwt_secret = get_validated_secret("JWT_SECRET")?;
        validate_jwt_secret(&jwt_secret, "JWT_SECRET")?;
        let jwt_expiry_hours = get_env_or_default("JWT_EXPIRY_HOURS", "24")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("JWT_EXPIRY_HOURS".to_string(), e.to_string())
            })?;

        let google = GoogleAuthConfig {
            client_id: get_required_env("GOOGLE_CLIENT_ID")?,
            android_client_id: get_optional_env("GOOGLE_ANDROID_CLIENT_ID"),
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_expiry_hours,
            google,
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

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the token signing secret meets minimum length requirements.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
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
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
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

    // Check entropy (real secrets have high entropy)
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
        let result = validate_secret_strength("your-signing-key-here", "TEST_VAR");
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
    fn test_validate_jwt_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_jwt_secret(&secret, "TEST_JWT").is_err());
    }

    #[test]
    fn test_validate_jwt_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        assert!(validate_jwt_secret(&secret, "TEST_JWT").is_ok());
    }

    #[test]
    fn test_google_audiences_deduplicates() {
        let same = GoogleAuthConfig {
            client_id: "web-id.apps.googleusercontent.com".to_string(),
            android_client_id: Some("web-id.apps.googleusercontent.com".to_string()),
        };
        assert_eq!(same.audiences().len(), 1);

        let distinct = GoogleAuthConfig {
            client_id: "web-id.apps.googleusercontent.com".to_string(),
            android_client_id: Some("android-id.apps.googleusercontent.com".to_string()),
        };
        assert_eq!(distinct.audiences().len(), 2);

        let missing = GoogleAuthConfig {
            client_id: "web-id.apps.googleusercontent.com".to_string(),
            android_client_id: None,
        };
        assert_eq!(
            missing.audiences(),
            vec!["web-id.apps.googleusercontent.com".to_string()]
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            jwt_secret: SecretString::from("x".repeat(32)),
            jwt_expiry_hours: 24,
            google: GoogleAuthConfig {
                client_id: "client-id".to_string(),
                android_client_id: None,
            },
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }
}
