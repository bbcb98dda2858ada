//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COZYHOOK_GATEWAY_URL` - Base URL of the catalog gateway endpoints
//!
//! ## Optional
//! - `COZYHOOK_ADMIN_TOKEN` - Shared admin token for catalog writes
//! - `COZYHOOK_CART_PATH` - Path of the persisted cart record
//!   (default: `cozy-hook-cart.json` in the working directory)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "todo",
    "fixme",
];

/// Default file name for the persisted cart record.
const DEFAULT_CART_FILE: &str = "cozy-hook-cart.json";

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

/// Client store configuration.
///
/// Implements `Debug` manually to redact the admin token.
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the catalog gateway (normalized to end with a slash)
    pub gateway_url: Url,
    /// Shared admin token for catalog writes; reads work without it
    pub admin_token: Option<SecretString>,
    /// Path of the durable cart record
    pub cart_path: PathBuf,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("gateway_url", &self.gateway_url.as_str())
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cart_path", &self.cart_path)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the admin token fails placeholder validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let gateway_url = get_required_env("COZYHOOK_GATEWAY_URL")?
            .parse::<Url>()
            .map(normalize_base_url)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("COZYHOOK_GATEWAY_URL".to_string(), e.to_string())
            })?;

        let admin_token = match get_optional_env("COZYHOOK_ADMIN_TOKEN") {
            Some(value) => {
                validate_secret_strength(&value, "COZYHOOK_ADMIN_TOKEN")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        let cart_path = PathBuf::from(get_env_or_default("COZYHOOK_CART_PATH", DEFAULT_CART_FILE));

        Ok(Self {
            gateway_url,
            admin_token,
            cart_path,
        })
    }

    /// Minimal configuration pointing at the given gateway, with no admin
    /// token and the default cart path.
    #[must_use]
    pub fn for_gateway(gateway_url: Url) -> Self {
        Self {
            gateway_url: normalize_base_url(gateway_url),
            admin_token: None,
            cart_path: PathBuf::from(DEFAULT_CART_FILE),
        }
    }

    /// Set the admin token, consuming and returning the config.
    #[must_use]
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the cart record path, consuming and returning the config.
    #[must_use]
    pub fn with_cart_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cart_path = path.into();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Ensure the gateway base URL path ends with a slash so `Url::join`
/// appends segments instead of replacing the last one.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_appends_slash() {
        let url = normalize_base_url("https://shop.example/api".parse().unwrap());
        assert_eq!(url.as_str(), "https://shop.example/api/");
    }

    #[test]
    fn test_normalize_base_url_keeps_existing_slash() {
        let url = normalize_base_url("https://shop.example/api/".parse().unwrap());
        assert_eq!(url.as_str(), "https://shop.example/api/");
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-admin-token-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_empty() {
        let result = validate_secret_strength("", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("k2v9-wool-and-weft-88", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_helpers() {
        let config = StoreConfig::for_gateway("https://shop.example/api".parse().unwrap())
            .with_admin_token("k2v9-wool-and-weft-88")
            .with_cart_path("/tmp/cart.json");

        assert_eq!(config.gateway_url.as_str(), "https://shop.example/api/");
        assert!(config.admin_token.is_some());
        assert_eq!(config.cart_path, PathBuf::from("/tmp/cart.json"));
    }

    #[test]
    fn test_debug_redacts_admin_token() {
        let config = StoreConfig::for_gateway("https://shop.example/api".parse().unwrap())
            .with_admin_token("super-secret-token-value");

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token-value"));
    }
}
