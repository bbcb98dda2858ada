//! Catalog browsing commands.

use cozy_hook_core::ProductId;
use cozy_hook_store::gateway::types::Product;
use cozy_hook_store::{ShopStore, StoreError};

/// List products, honoring the optional filters.
///
/// # Errors
///
/// Never fails today; the catalog degrades to fallback data internally.
pub async fn list(
    store: &ShopStore,
    category: Option<&str>,
    featured: bool,
    banner: bool,
) -> Result<(), StoreError> {
    store.init().await;

    let products = if featured {
        store.featured_products()
    } else if banner {
        store.banner_products()
    } else if let Some(name) = category {
        store.products_in_category(name)
    } else {
        store.display_ordered_products()
    };

    if products.is_empty() {
        println!("(no products)");
        return Ok(());
    }

    for product in &products {
        println!(
            "{:24}  {:>8}  {:32}  {}",
            product.id.as_str(),
            product.price.to_string(),
            product.title,
            product.category
        );
    }
    Ok(())
}

/// Print one product in full.
///
/// # Errors
///
/// Returns `NotFound` if the id is not in the fetched catalog.
pub async fn show(store: &ShopStore, id: &str) -> Result<(), StoreError> {
    store.init().await;

    let id = ProductId::new(id);
    let product = store
        .products()
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    print_product(&product);
    Ok(())
}

fn print_product(product: &Product) {
    println!("{}  ({})", product.title, product.id);
    println!("  price:     {}", product.price);
    println!("  category:  {}", product.category);
    println!("  stock:     {}", product.stock);
    if !product.tags.is_empty() {
        println!("  tags:      {}", product.tags.join(", "));
    }
    if product.featured {
        println!("  featured:  yes");
    }
    if product.banner {
        let caption = product.banner_caption.as_deref().unwrap_or("(no caption)");
        println!("  banner:    yes - {caption}");
    }
    println!("  image:     {}", product.image);
    for extra in &product.images {
        if extra != &product.image {
            println!("             {extra}");
        }
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
}
