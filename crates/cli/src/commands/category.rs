//! Category administration commands.
//!
//! All writes require `COZYHOOK_ADMIN_TOKEN`.

use cozy_hook_core::CategoryId;
use cozy_hook_store::{ShopStore, StoreError};

/// List categories in display order.
pub async fn list(store: &ShopStore) {
    store.init().await;

    let categories = store.categories();
    if categories.is_empty() {
        println!("(no categories)");
        return;
    }

    for category in &categories {
        println!(
            "{:>3}  {:24}  {}",
            category.sort_order,
            category.id.as_str(),
            category.name
        );
    }
}

/// Create a category at the end of the display order.
///
/// # Errors
///
/// Returns an error if the gateway rejects the write.
pub async fn add(store: &ShopStore, name: &str) -> Result<(), StoreError> {
    store.init().await;
    store.add_category(name).await?;
    println!("created category {name:?}");
    list_current(store);
    Ok(())
}

/// Delete a category.
///
/// Products referencing the deleted name are silently orphaned; the
/// backend does not cascade.
///
/// # Errors
///
/// Returns an error if the gateway rejects the write.
pub async fn delete(store: &ShopStore, id: &str) -> Result<(), StoreError> {
    store.init().await;
    store.delete_category(&CategoryId::new(id)).await?;
    println!("deleted category {id}");
    Ok(())
}

/// Reorder categories to match the given id sequence.
///
/// Identifiers not in the current snapshot are rejected before any network
/// call; identifiers omitted from the sequence are appended in their
/// current relative order.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, or the gateway error if the
/// backend rejects the write (the cache rolls back via re-fetch first).
pub async fn reorder(store: &ShopStore, ids: &[String]) -> Result<(), StoreError> {
    store.init().await;

    let current = store.categories();
    let mut new_order = Vec::with_capacity(current.len());

    for id in ids {
        let category = current
            .iter()
            .find(|c| c.id.as_str() == id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        new_order.push(category.clone());
    }
    for category in &current {
        if !ids.iter().any(|id| category.id.as_str() == id.as_str()) {
            new_order.push(category.clone());
        }
    }

    store.reorder_categories(new_order).await?;
    list_current(store);
    Ok(())
}

fn list_current(store: &ShopStore) {
    for category in store.categories() {
        println!("{:>3}  {}", category.sort_order, category.name);
    }
}
