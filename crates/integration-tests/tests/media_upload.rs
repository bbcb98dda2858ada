//! Admin image upload through the gateway client.

use cozy_hook_integration_tests::{ADMIN_TOKEN, MockGateway, scratch_cart_path};
use cozy_hook_store::ShopStore;
use cozy_hook_store::config::StoreConfig;
use cozy_hook_store::gateway::types::ImageUpload;

#[tokio::test]
async fn upload_round_trips_bytes_and_returns_public_url() {
    let gateway = MockGateway::spawn(Vec::new(), Vec::new()).await;

    let config = StoreConfig::for_gateway(gateway.base_url.parse().expect("mock base url"))
        .with_admin_token(ADMIN_TOKEN)
        .with_cart_path(scratch_cart_path());
    let store = ShopStore::new(&config);

    let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]; // JPEG magic prefix
    let url = store
        .upload_image(&ImageUpload {
            file_name: "beanie.jpg".to_owned(),
            content_type: "image/jpeg".to_owned(),
            data: bytes.clone(),
        })
        .await
        .expect("upload accepted");

    // Stored under the fixed public prefix, named as requested.
    assert_eq!(url, "https://cdn.test/public/beanie.jpg");

    let uploads = gateway.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "beanie.jpg");
    assert_eq!(uploads[0].1, bytes);
}

#[tokio::test]
async fn upload_without_token_is_rejected() {
    let gateway = MockGateway::spawn(Vec::new(), Vec::new()).await;

    let config = StoreConfig::for_gateway(gateway.base_url.parse().expect("mock base url"))
        .with_cart_path(scratch_cart_path());
    let store = ShopStore::new(&config);

    let result = store
        .upload_image(&ImageUpload {
            file_name: "beanie.jpg".to_owned(),
            content_type: "image/jpeg".to_owned(),
            data: vec![1, 2, 3],
        })
        .await;

    assert!(result.is_err());
    assert!(gateway.uploads().is_empty());
}
