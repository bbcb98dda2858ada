//! Unified error handling for the client store.
//!
//! Per-concern errors (`ConfigError`, `GatewayError`, `StorageError`) stay
//! with their modules; this type aggregates them for facade-level callers.
//! Catalog read failures never appear here - they degrade to fallback or
//! retained snapshots inside the cache.

use thiserror::Error;

use crate::cart::storage::StorageError;
use crate::config::ConfigError;
use crate::gateway::GatewayError;

/// Application-level error type for the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A gateway write was rejected or failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The cart record could not be written.
    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// A referenced product is not in the current catalog snapshot.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound("prod-123".to_string());
        assert_eq!(err.to_string(), "Not found: prod-123");

        let err = StoreError::Gateway(GatewayError::MissingCredential);
        assert_eq!(err.to_string(), "Gateway error: admin token not configured");
    }
}
