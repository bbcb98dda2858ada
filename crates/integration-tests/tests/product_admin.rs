//! Product administration flows: create and delete, each followed by a
//! full product re-sync.

use cozy_hook_core::{Price, ProductId};
use cozy_hook_integration_tests::{ADMIN_TOKEN, MockGateway, product, scratch_cart_path};
use cozy_hook_store::ShopStore;
use cozy_hook_store::config::StoreConfig;
use cozy_hook_store::gateway::types::NewProduct;

fn admin_store_for(gateway: &MockGateway) -> ShopStore {
    let config = StoreConfig::for_gateway(gateway.base_url.parse().expect("mock base url"))
        .with_admin_token(ADMIN_TOKEN)
        .with_cart_path(scratch_cart_path());
    ShopStore::new(&config)
}

fn new_product(title: &str) -> NewProduct {
    NewProduct {
        title: title.to_owned(),
        price: Price::from_cents(3200),
        image: "https://cdn.test/public/frog.jpg".to_owned(),
        images: vec!["https://cdn.test/public/frog.jpg".to_owned()],
        category: "Amigurumi".to_owned(),
        description: "Wide-mouthed frog in forest green.".to_owned(),
        stock: 4,
        tags: vec!["frog".to_owned()],
        featured: false,
        banner: false,
        banner_caption: None,
    }
}

#[tokio::test]
async fn create_product_resyncs_snapshot() {
    let gateway =
        MockGateway::spawn(vec![product("p1", "Octopus", "Amigurumi", 2400)], Vec::new()).await;

    let store = admin_store_for(&gateway);
    store.init().await;

    let created = store
        .create_product(&new_product("Ferdinand the Frog"))
        .await
        .expect("create product");
    assert!(!created.id.as_str().is_empty());

    let products = store.products();
    assert_eq!(products.len(), 2);
    assert!(products.iter().any(|p| p.id == created.id));
}

#[tokio::test]
async fn delete_product_resyncs_snapshot() {
    let gateway = MockGateway::spawn(
        vec![
            product("p1", "Octopus", "Amigurumi", 2400),
            product("p2", "Beanie", "Wearables", 1800),
        ],
        Vec::new(),
    )
    .await;

    let store = admin_store_for(&gateway);
    store.init().await;

    store
        .delete_product(&ProductId::new("p1"))
        .await
        .expect("delete product");

    let products = store.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id.as_str(), "p2");
}
