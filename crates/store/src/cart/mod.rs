//! The cart ledger: an explicit state container for the shopping list.
//!
//! The cart is purely local - it is a shopping list the buyer screenshots
//! and sends to the seller, so there is no checkout, payment, or order
//! subsystem and no server round-trip. All mutation goes through
//! [`CartAction`] applied by [`CartLedger::apply`].

pub mod storage;

use serde::{Deserialize, Serialize};

use cozy_hook_core::{Price, ProductId};

use crate::gateway::types::Product;

/// A cart line: a product value plus a positive quantity.
///
/// The product is frozen at its first-added values - later catalog price or
/// title changes are not reflected in an existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// A mutation of the cart ledger.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add one unit of a product; increments the existing line if present.
    Add(Product),
    /// Delete a line; no-op if absent.
    Remove(ProductId),
    /// Set a line's quantity, clamped to a minimum of 1; no-op if absent.
    /// Removal is a separate explicit action.
    SetQuantity { id: ProductId, quantity: u32 },
    /// Empty the ledger unconditionally.
    Clear,
}

/// Ordered collection of cart lines, keyed by product identifier.
///
/// At most one line exists per product id; first-add insertion order is
/// preserved for display. Totals are derived on every read, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLedger {
    items: Vec<CartItem>,
}

impl CartLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a ledger from previously persisted lines.
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Apply one action to the ledger.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(product) => self.add(product),
            CartAction::Remove(id) => self.remove(&id),
            CartAction::SetQuantity { id, quantity } => self.set_quantity(&id, quantity),
            CartAction::Clear => self.items.clear(),
        }
    }

    fn add(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            // Existing line: bump the count, keep the frozen product value.
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    fn remove(&mut self, id: &ProductId) {
        self.items.retain(|i| i.product.id != *id);
    }

    fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == *id) {
            item.quantity = quantity.max(1);
        }
    }

    /// Cart lines in first-add order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * quantity` over all lines, recomputed on every call.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items
            .iter()
            .map(|i| i.product.price.total(i.quantity))
            .sum()
    }

    /// Sum of quantities over all lines, recomputed on every call.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
