//! Local cart commands.
//!
//! The cart never talks to the gateway except when `add` needs the product
//! record from the catalog; everything else is a local mutation persisted
//! to the cart record.

use cozy_hook_core::ProductId;
use cozy_hook_store::cart::CartAction;
use cozy_hook_store::{ShopStore, StoreError};

/// Print the cart with derived totals.
pub fn show(store: &ShopStore) {
    let items = store.cart_items();
    if items.is_empty() {
        println!("(cart is empty)");
        return;
    }

    for item in &items {
        println!(
            "{:24}  x{:<3}  {:>8}  {}",
            item.product.id.as_str(),
            item.quantity,
            item.product.price.total(item.quantity).to_string(),
            item.product.title
        );
    }
    println!(
        "\n{} items, total {}",
        store.cart_total_items(),
        store.cart_total_price()
    );
}

/// Add one unit of a product from the live catalog.
///
/// # Errors
///
/// Returns `NotFound` for an unknown product id, or a storage error if the
/// cart record cannot be written.
pub async fn add(store: &ShopStore, id: &str) -> Result<(), StoreError> {
    store.init().await;
    store.add_to_cart(&ProductId::new(id))?;
    println!("added {id}; cart has {} items", store.cart_total_items());
    Ok(())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns a storage error if the cart record cannot be written.
pub fn remove(store: &ShopStore, id: &str) -> Result<(), StoreError> {
    store.dispatch(CartAction::Remove(ProductId::new(id)))?;
    println!("removed {id}");
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns a storage error if the cart record cannot be written.
pub fn set(store: &ShopStore, id: &str, quantity: u32) -> Result<(), StoreError> {
    store.dispatch(CartAction::SetQuantity {
        id: ProductId::new(id),
        quantity,
    })?;
    show(store);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns a storage error if the cart record cannot be written.
pub fn clear(store: &ShopStore) -> Result<(), StoreError> {
    store.dispatch(CartAction::Clear)?;
    println!("cart cleared");
    Ok(())
}
