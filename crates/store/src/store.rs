//! The store facade: one access surface over the cart ledger and the
//! catalog cache.
//!
//! A [`ShopStore`] is constructed once at process start (loading the
//! persisted cart) and [`ShopStore::init`] triggers both catalog fetches
//! exactly once. Nothing else ever re-triggers them except the explicit
//! re-sync calls inside the admin flows. The cart is reset only by an
//! explicit [`CartAction::Clear`].

use std::sync::{Mutex, PoisonError};

use cozy_hook_core::{CategoryId, Price, ProductId};
use tracing::instrument;

use crate::cart::storage::CartStorage;
use crate::cart::{CartAction, CartItem, CartLedger};
use crate::catalog::CatalogCache;
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::gateway::CatalogGateway;
use crate::gateway::types::{CategoryEntity, ImageUpload, NewProduct, Product};

/// Aggregates the cart ledger and the catalog cache.
///
/// All state lives behind locks that are never held across an await;
/// network calls suspend the calling flow without blocking other state
/// access. Identifiers are opaque strings and are not validated here.
pub struct ShopStore {
    catalog: CatalogCache,
    cart: Mutex<CartLedger>,
    storage: CartStorage,
}

impl ShopStore {
    /// Build a store from configuration, loading any persisted cart.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let gateway = CatalogGateway::new(config);
        let storage = CartStorage::new(config.cart_path.clone());
        let cart = CartLedger::from_items(storage.load());

        Self {
            catalog: CatalogCache::new(gateway),
            cart: Mutex::new(cart),
            storage,
        }
    }

    /// Fetch both catalog collections, concurrently.
    ///
    /// Called once at session start. Read failures degrade inside the
    /// cache (fallback data or retained snapshot) and are not surfaced.
    #[instrument(skip(self))]
    pub async fn init(&self) {
        tokio::join!(self.catalog.fetch_products(), self.catalog.fetch_categories());
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Apply a cart action and persist the result.
    ///
    /// Persistence is synchronous on every mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart record cannot be written; the
    /// in-memory ledger keeps the applied action either way.
    pub fn dispatch(&self, action: CartAction) -> Result<()> {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        cart.apply(action);
        self.storage.save(cart.items())?;
        Ok(())
    }

    /// Add one unit of the product with the given id from the current
    /// catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is not in the snapshot.
    pub fn add_to_cart(&self, id: &ProductId) -> Result<()> {
        let product = self
            .catalog
            .products()
            .into_iter()
            .find(|p| p.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.dispatch(CartAction::Add(product))
    }

    /// Cart lines in first-add order.
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .items()
            .to_vec()
    }

    /// Derived cart total price.
    #[must_use]
    pub fn cart_total_price(&self) -> Price {
        self.cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total_price()
    }

    /// Derived cart item count.
    #[must_use]
    pub fn cart_total_items(&self) -> u32 {
        self.cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total_items()
    }

    // =========================================================================
    // Catalog reads
    // =========================================================================

    /// Current product snapshot.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.catalog.products()
    }

    /// Current categories in display order.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryEntity> {
        self.catalog.categories()
    }

    /// Products flagged featured.
    #[must_use]
    pub fn featured_products(&self) -> Vec<Product> {
        self.catalog.featured_products()
    }

    /// Products flagged for the hero banner.
    #[must_use]
    pub fn banner_products(&self) -> Vec<Product> {
        self.catalog.banner_products()
    }

    /// Products in the named category (name-string association).
    #[must_use]
    pub fn products_in_category(&self, name: &str) -> Vec<Product> {
        self.catalog.products_in_category(name)
    }

    /// All products in display order.
    #[must_use]
    pub fn display_ordered_products(&self) -> Vec<Product> {
        self.catalog.display_ordered_products()
    }

    /// Direct access to the catalog cache.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    // =========================================================================
    // Admin flows
    // =========================================================================

    /// Create a category at the end of the display order, then re-sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the write.
    pub async fn add_category(&self, name: &str) -> Result<()> {
        self.catalog.add_category(name).await?;
        Ok(())
    }

    /// Delete a category, then re-sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the write.
    pub async fn delete_category(&self, id: &CategoryId) -> Result<()> {
        self.catalog.delete_category(id).await?;
        Ok(())
    }

    /// Optimistically reorder categories; see
    /// [`CatalogCache::reorder_categories`].
    ///
    /// # Errors
    ///
    /// Returns the gateway error for a rejected write, after rollback.
    pub async fn reorder_categories(&self, new_order: Vec<CategoryEntity>) -> Result<()> {
        self.catalog.reorder_categories(new_order).await?;
        Ok(())
    }

    /// Create a product, then re-sync the product snapshot.
    ///
    /// Products are mutated wholesale through create/delete; there is no
    /// partial-field update path.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the write.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let created = self.catalog.gateway().create_product(product).await?;
        self.catalog.fetch_products().await;
        Ok(created)
    }

    /// Delete a product, then re-sync the product snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the write.
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.catalog.gateway().delete_product(id).await?;
        self.catalog.fetch_products().await;
        Ok(())
    }

    /// Upload an image; returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the upload.
    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<String> {
        Ok(self.catalog.gateway().upload_image(upload).await?)
    }
}
