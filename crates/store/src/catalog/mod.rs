//! In-memory catalog cache with fetch-and-reconcile flows.
//!
//! The cache holds one snapshot per collection (products, categories).
//! Snapshots are replaced wholesale on every successful fetch - there is no
//! incremental patching. Synchronous reads never touch the network.
//!
//! # Degradation
//!
//! Read failures never surface to callers. A fetch that fails before the
//! collection has ever loaded substitutes the built-in fallback data; a
//! fetch that fails after a successful load keeps the last good snapshot
//! and logs a warning. An empty product response is a valid catalog state
//! and is applied verbatim; an empty category response substitutes the
//! legacy name list instead.
//!
//! # Ordering
//!
//! Fetches carry no cancellation. Each issue bumps an atomic sequence
//! counter and a response is applied only while its sequence is still the
//! newest, so a slow stale response can never overwrite a fresher one.

pub mod fallback;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::instrument;

use cozy_hook_core::CategoryId;

use crate::gateway::types::{
    CategoryEntity, CategoryOrderUpdate, NewCategory, Product, ProductFilter,
};
use crate::gateway::{CatalogGateway, GatewayError};

/// One collection's cached state.
///
/// `loaded` is set only by a successful fetch; fallback substitution for a
/// failed first load does not count.
#[derive(Debug)]
struct Snapshot<T> {
    items: Vec<T>,
    loaded: bool,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Catalog cache in front of the gateway client.
///
/// Locks are never held across an await.
pub struct CatalogCache {
    gateway: CatalogGateway,
    products: RwLock<Snapshot<Product>>,
    categories: RwLock<Snapshot<CategoryEntity>>,
    product_seq: AtomicU64,
    category_seq: AtomicU64,
}

impl CatalogCache {
    /// Create an empty cache over the given gateway client.
    #[must_use]
    pub fn new(gateway: CatalogGateway) -> Self {
        Self {
            gateway,
            products: RwLock::new(Snapshot::default()),
            categories: RwLock::new(Snapshot::default()),
            product_seq: AtomicU64::new(0),
            category_seq: AtomicU64::new(0),
        }
    }

    /// The underlying gateway client.
    #[must_use]
    pub const fn gateway(&self) -> &CatalogGateway {
        &self.gateway
    }

    // =========================================================================
    // Fetch-and-reconcile flows
    // =========================================================================

    /// Refresh the product snapshot from the gateway.
    ///
    /// Failures degrade as described in the module docs and are not
    /// returned to the caller.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) {
        let seq = self.product_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.gateway.list_products(&ProductFilter::default()).await;

        let mut snapshot = write_lock(&self.products);
        if self.product_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("discarding stale products response");
            return;
        }

        match result {
            // Any well-formed array replaces the snapshot verbatim; an
            // empty catalog is a valid catalog.
            Ok(items) => {
                tracing::debug!(count = items.len(), "products snapshot replaced");
                snapshot.items = items;
                snapshot.loaded = true;
            }
            Err(e) if snapshot.loaded => {
                tracing::warn!(error = %e, "products fetch failed; keeping last good snapshot");
            }
            Err(e) => {
                tracing::warn!(error = %e, "products fetch failed before first load; using sample catalog");
                snapshot.items = fallback::sample_products();
            }
        }
    }

    /// Refresh the category snapshot from the gateway.
    ///
    /// Same degradation rules as [`fetch_products`](Self::fetch_products),
    /// except an empty response also substitutes the fallback: categories
    /// synthesized from the legacy name list with sort orders `0..n-1`.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) {
        let seq = self.category_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.gateway.list_categories().await;

        let mut snapshot = write_lock(&self.categories);
        if self.category_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("discarding stale categories response");
            return;
        }

        match result {
            Ok(items) if items.is_empty() => {
                tracing::debug!("empty category response; substituting legacy names");
                snapshot.items = fallback::legacy_categories();
                snapshot.loaded = true;
            }
            Ok(items) => {
                tracing::debug!(count = items.len(), "categories snapshot replaced");
                snapshot.items = items;
                snapshot.loaded = true;
            }
            Err(e) if snapshot.loaded => {
                tracing::warn!(error = %e, "categories fetch failed; keeping last good snapshot");
            }
            Err(e) => {
                tracing::warn!(error = %e, "categories fetch failed before first load; using legacy names");
                snapshot.items = fallback::legacy_categories();
            }
        }
    }

    // =========================================================================
    // Category administration
    // =========================================================================

    /// Create a category named `name` at the end of the display order.
    ///
    /// The new sort order is one greater than the current maximum (0 if no
    /// categories exist). On success the snapshot is re-synced with a full
    /// fetch; there is no optimistic local insert.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the create request fails; the snapshot
    /// is left untouched in that case.
    #[instrument(skip(self))]
    pub async fn add_category(&self, name: &str) -> Result<(), GatewayError> {
        let sort_order = {
            let snapshot = read_lock(&self.categories);
            snapshot
                .items
                .iter()
                .map(|c| c.sort_order)
                .max()
                .map_or(0, |max| max + 1)
        };

        self.gateway
            .create_category(&NewCategory {
                name: name.to_owned(),
                sort_order,
            })
            .await?;

        self.fetch_categories().await;
        Ok(())
    }

    /// Delete a category. On success the snapshot is re-synced with a full
    /// fetch.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the delete request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), GatewayError> {
        self.gateway.delete_category(id).await?;
        self.fetch_categories().await;
        Ok(())
    }

    /// Reorder categories optimistically.
    ///
    /// The snapshot is replaced with the caller-supplied order immediately,
    /// before network confirmation, with sort orders assigned by list
    /// position; the full reindexed list is then sent to the gateway. If
    /// the gateway rejects the write, the cache rolls back by issuing a
    /// fresh fetch - so the post-rollback state is whatever the backend
    /// currently holds (eventually consistent, not a revert to the
    /// pre-optimistic snapshot) - and the write error is still returned.
    ///
    /// # Errors
    ///
    /// Returns the gateway error for a rejected write, after the rollback
    /// fetch has completed.
    #[instrument(skip(self, new_order), fields(count = new_order.len()))]
    pub async fn reorder_categories(
        &self,
        new_order: Vec<CategoryEntity>,
    ) -> Result<(), GatewayError> {
        let updates = self.apply_optimistic_order(new_order);

        match self.gateway.reorder_categories(&updates).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "category reorder rejected; rolling back via re-fetch");
                self.fetch_categories().await;
                Err(e)
            }
        }
    }

    /// Replace the category snapshot with `new_order`, reindexing sort
    /// orders by position. Returns the reindexed list for the backend.
    fn apply_optimistic_order(&self, new_order: Vec<CategoryEntity>) -> Vec<CategoryOrderUpdate> {
        let reindexed: Vec<CategoryEntity> = new_order
            .into_iter()
            .enumerate()
            .map(|(position, mut category)| {
                category.sort_order = i64::try_from(position).unwrap_or(i64::MAX);
                category
            })
            .collect();

        let updates = reindexed
            .iter()
            .map(|category| CategoryOrderUpdate {
                id: category.id.clone(),
                sort_order: category.sort_order,
            })
            .collect();

        let mut snapshot = write_lock(&self.categories);
        snapshot.items = reindexed;

        updates
    }

    // =========================================================================
    // Synchronous reads
    // =========================================================================

    /// Current product snapshot, verbatim.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        read_lock(&self.products).items.clone()
    }

    /// Current categories, sorted by sort order (stable on ties).
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryEntity> {
        let mut categories = read_lock(&self.categories).items.clone();
        categories.sort_by_key(|c| c.sort_order);
        categories
    }

    /// Products flagged for the featured strip.
    #[must_use]
    pub fn featured_products(&self) -> Vec<Product> {
        read_lock(&self.products)
            .items
            .iter()
            .filter(|p| p.featured)
            .cloned()
            .collect()
    }

    /// Products flagged for the hero banner.
    #[must_use]
    pub fn banner_products(&self) -> Vec<Product> {
        read_lock(&self.products)
            .items
            .iter()
            .filter(|p| p.banner)
            .cloned()
            .collect()
    }

    /// Products whose category name matches `name` exactly.
    ///
    /// Association is by name string; products referencing a renamed or
    /// deleted category simply match nothing.
    #[must_use]
    pub fn products_in_category(&self, name: &str) -> Vec<Product> {
        read_lock(&self.products)
            .items
            .iter()
            .filter(|p| p.category == name)
            .cloned()
            .collect()
    }

    /// All products in display order: category sort order first, ties
    /// broken by product title. Products referencing an unknown category
    /// sort last.
    #[must_use]
    pub fn display_ordered_products(&self) -> Vec<Product> {
        let precedence: HashMap<String, i64> = read_lock(&self.categories)
            .items
            .iter()
            .map(|c| (c.name.clone(), c.sort_order))
            .collect();

        let mut products = read_lock(&self.products).items.clone();
        products.sort_by(|a, b| {
            let pa = precedence.get(&a.category).copied().unwrap_or(i64::MAX);
            let pb = precedence.get(&b.category).copied().unwrap_or(i64::MAX);
            pa.cmp(&pb).then_with(|| a.title.cmp(&b.title))
        });
        products
    }

    // =========================================================================
    // Test seams
    // =========================================================================

    #[cfg(test)]
    fn seed_products(&self, items: Vec<Product>) {
        let mut snapshot = write_lock(&self.products);
        snapshot.items = items;
        snapshot.loaded = true;
    }

    #[cfg(test)]
    fn seed_categories(&self, items: Vec<CategoryEntity>) {
        let mut snapshot = write_lock(&self.categories);
        snapshot.items = items;
        snapshot.loaded = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cozy_hook_core::{CategoryId, Price, ProductId};

    use super::*;
    use crate::config::StoreConfig;

    fn offline_cache() -> CatalogCache {
        let config = StoreConfig::for_gateway("http://127.0.0.1:9/api".parse().unwrap());
        CatalogCache::new(CatalogGateway::new(&config))
    }

    fn category(id: &str, name: &str, sort_order: i64) -> CategoryEntity {
        CategoryEntity {
            id: CategoryId::new(id),
            name: name.to_owned(),
            sort_order,
            created_at: None,
        }
    }

    fn product(id: &str, title: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_owned(),
            price: Price::from_cents(1000),
            image: String::new(),
            images: Vec::new(),
            category: category.to_owned(),
            description: String::new(),
            stock: 1,
            tags: Vec::new(),
            featured: false,
            banner: false,
            banner_caption: None,
        }
    }

    #[test]
    fn test_optimistic_reorder_is_immediately_readable() {
        let cache = offline_cache();
        cache.seed_categories(vec![
            category("a", "Amigurumi", 0),
            category("b", "Blankets", 1),
            category("c", "Wearables", 2),
        ]);

        // Caller-supplied order C, A, B must be readable synchronously,
        // before any network confirmation.
        let new_order = vec![
            category("c", "Wearables", 2),
            category("a", "Amigurumi", 0),
            category("b", "Blankets", 1),
        ];
        let updates = cache.apply_optimistic_order(new_order);

        let names: Vec<String> = cache.categories().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Wearables", "Amigurumi", "Blankets"]);

        // Sort orders are reassigned by position in the new list.
        let orders: Vec<i64> = updates.iter().map(|u| u.sort_order).collect();
        assert_eq!(orders, [0, 1, 2]);
    }

    #[test]
    fn test_categories_sorted_by_sort_order() {
        let cache = offline_cache();
        cache.seed_categories(vec![
            category("b", "Blankets", 5),
            category("a", "Amigurumi", 1),
        ]);

        let names: Vec<String> = cache.categories().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Amigurumi", "Blankets"]);
    }

    #[test]
    fn test_display_order_uses_category_precedence_then_title() {
        let cache = offline_cache();
        cache.seed_categories(vec![
            category("w", "Wearables", 0),
            category("a", "Amigurumi", 1),
        ]);
        cache.seed_products(vec![
            product("1", "Zebra", "Amigurumi"),
            product("2", "Mittens", "Wearables"),
            product("3", "Bee", "Amigurumi"),
            product("4", "Orphaned Thing", "Retired Category"),
        ]);

        let titles: Vec<String> = cache
            .display_ordered_products()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["Mittens", "Bee", "Zebra", "Orphaned Thing"]);
    }

    #[test]
    fn test_promo_and_category_reads() {
        let cache = offline_cache();
        let mut featured = product("1", "Octopus", "Amigurumi");
        featured.featured = true;
        let mut banner = product("2", "Beanie", "Wearables");
        banner.banner = true;
        cache.seed_products(vec![featured, banner, product("3", "Throw", "Blankets")]);

        assert_eq!(cache.featured_products().len(), 1);
        assert_eq!(cache.banner_products().len(), 1);
        assert_eq!(cache.products_in_category("Blankets").len(), 1);
        assert!(cache.products_in_category("No Such Name").is_empty());
    }
}
