//! HTTP client for the remote catalog gateway.
//!
//! The gateway is a set of hosted endpoints in front of the managed backend.
//! Reads are public; admin writes carry a bearer credential equal to the
//! single shared admin token (a capability-style shared secret, not per-user
//! authentication).
//!
//! Every read request carries a monotonically increasing `ts` query
//! parameter to defeat intermediate HTTP caches.
//!
//! # Example
//!
//! ```rust,ignore
//! use cozy_hook_store::gateway::CatalogGateway;
//!
//! let gateway = CatalogGateway::new(&config);
//! let products = gateway.list_products(&ProductFilter::default()).await?;
//! let categories = gateway.list_categories().await?;
//! ```

pub mod types;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use cozy_hook_core::{CategoryId, ProductId};

use crate::config::StoreConfig;
use types::{
    CategoryEntity, CategoryOrderUpdate, ErrorBody, ImageUpload, NewCategory, NewProduct, Product,
    ProductFilter, UploadedImage,
};

/// Errors that can occur when talking to the catalog gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built from the configured base.
    #[error("invalid gateway URL: {0}")]
    Url(#[from] url::ParseError),

    /// An admin operation was attempted without a configured admin token.
    #[error("admin token not configured")]
    MissingCredential,
}

impl GatewayError {
    /// Whether this error is an authorization rejection. There is no
    /// recovery path other than supplying the correct admin token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

// =============================================================================
// CatalogGateway
// =============================================================================

/// Client for the catalog gateway endpoints.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct CatalogGateway {
    inner: Arc<CatalogGatewayInner>,
}

struct CatalogGatewayInner {
    client: reqwest::Client,
    base_url: Url,
    admin_token: Option<SecretString>,
    cache_bust: AtomicU64,
}

impl CatalogGateway {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        // Seeded from wall-clock millis so values keep increasing across
        // process restarts, like the timestamp parameter they stand in for.
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        Self {
            inner: Arc::new(CatalogGatewayInner {
                client: reqwest::Client::new(),
                base_url: config.gateway_url.clone(),
                admin_token: config.admin_token.clone(),
                cache_bust: AtomicU64::new(seed),
            }),
        }
    }

    /// Next value of the cache-busting `ts` parameter.
    fn next_cache_bust(&self) -> u64 {
        self.inner.cache_bust.fetch_add(1, Ordering::Relaxed)
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        // The base URL is normalized to end with a slash at config time,
        // so join() appends instead of replacing the last segment.
        Ok(self.inner.base_url.join(path)?)
    }

    fn admin_token(&self) -> Result<&SecretString, GatewayError> {
        self.inner
            .admin_token
            .as_ref()
            .ok_or(GatewayError::MissingCredential)
    }

    /// Decode a gateway response, mapping non-success statuses to
    /// [`GatewayError::Status`] with the server-supplied message.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse gateway response"
            );
            GatewayError::Parse(e)
        })
    }

    /// Check a write response for success, ignoring any body.
    async fn check_status(response: reqwest::Response) -> Result<(), GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Self::status_error(status, &body))
    }

    fn status_error(status: StatusCode, body: &str) -> GatewayError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        tracing::error!(
            status = %status,
            message = %message,
            "Gateway returned non-success status"
        );

        GatewayError::Status {
            status: status.as_u16(),
            message,
        }
    }

    // =========================================================================
    // Public reads
    // =========================================================================

    /// List products, optionally filtered by promotion flag or category name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, GatewayError> {
        let url = self.endpoint("products")?;
        let ts = self.next_cache_bust().to_string();

        let mut query: Vec<(&str, String)> = vec![("ts", ts)];
        if let Some(promo) = filter.promo {
            query.push(("type", promo.as_query_value().to_owned()));
        }
        if let Some(category) = &filter.category {
            query.push(("category", category.clone()));
        }

        let response = self.inner.client.get(url).query(&query).send().await?;
        Self::decode(response).await
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryEntity>, GatewayError> {
        let url = self.endpoint("categories")?;
        let ts = self.next_cache_bust().to_string();

        let response = self
            .inner
            .client
            .get(url)
            .query(&[("ts", ts)])
            .send()
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Admin writes (bearer token required)
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if no admin token is configured, the token is
    /// rejected, or the request fails.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, GatewayError> {
        let url = self.endpoint("products")?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(self.admin_token()?.expose_secret())
            .json(product)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if no admin token is configured, the token is
    /// rejected, or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        let response = self
            .inner
            .client
            .delete(url)
            .bearer_auth(self.admin_token()?.expose_secret())
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Create a category with the given display name and sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if no admin token is configured, the token is
    /// rejected, or the request fails.
    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create_category(
        &self,
        category: &NewCategory,
    ) -> Result<CategoryEntity, GatewayError> {
        let url = self.endpoint("categories")?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(self.admin_token()?.expose_secret())
            .json(category)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if no admin token is configured, the token is
    /// rejected, or the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("categories/{id}"))?;
        let response = self
            .inner
            .client
            .delete(url)
            .bearer_auth(self.admin_token()?.expose_secret())
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Replace the sort order of all categories in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if no admin token is configured, the token is
    /// rejected, or the request fails.
    #[instrument(skip(self, order), fields(count = order.len()))]
    pub async fn reorder_categories(
        &self,
        order: &[CategoryOrderUpdate],
    ) -> Result<(), GatewayError> {
        let url = self.endpoint("categories/order")?;
        let response = self
            .inner
            .client
            .put(url)
            .bearer_auth(self.admin_token()?.expose_secret())
            .json(order)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Upload an image to public object storage; returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no admin token is configured, the token is
    /// rejected, or the request fails.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, bytes = upload.data.len()))]
    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<String, GatewayError> {
        let url = self.endpoint("images")?;
        let body = serde_json::json!({
            "file_name": upload.file_name,
            "content_type": upload.content_type,
            "data": BASE64.encode(&upload.data),
        });

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(self.admin_token()?.expose_secret())
            .json(&body)
            .send()
            .await?;

        let uploaded: UploadedImage = Self::decode(response).await?;
        Ok(uploaded.url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn test_config() -> StoreConfig {
        StoreConfig::for_gateway("http://127.0.0.1:9/api".parse().unwrap())
    }

    #[test]
    fn test_endpoint_joins_below_base() {
        let gateway = CatalogGateway::new(&test_config());
        let url = gateway.endpoint("products").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/api/products");
    }

    #[test]
    fn test_cache_bust_is_strictly_increasing() {
        let gateway = CatalogGateway::new(&test_config());
        let a = gateway.next_cache_bust();
        let b = gateway.next_cache_bust();
        let c = gateway.next_cache_bust();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_admin_ops_require_token() {
        let gateway = CatalogGateway::new(&test_config());
        assert!(matches!(
            gateway.admin_token(),
            Err(GatewayError::MissingCredential)
        ));
    }

    #[test]
    fn test_status_error_extracts_message() {
        let err = CatalogGateway::status_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "invalid admin token"}"#,
        );
        assert!(err.is_unauthorized());
        match err {
            GatewayError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid admin token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_falls_back_to_raw_body() {
        let err = CatalogGateway::status_error(StatusCode::BAD_GATEWAY, "upstream exploded");
        match err {
            GatewayError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
