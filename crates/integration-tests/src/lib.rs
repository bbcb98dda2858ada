//! Integration test harness for Cozy Hook.
//!
//! Provides [`MockGateway`], an in-process axum server standing in for the
//! hosted catalog gateway. Each test spawns its own instance on an
//! ephemeral port and points a real [`cozy_hook_store::ShopStore`] at it.
//!
//! The mock exposes the same endpoints the production gateway does:
//!
//! - `GET  /products` (filters: `type=featured|banner`, `category=<name>`)
//! - `GET  /categories`
//! - `POST /products`, `DELETE /products/{id}` (bearer token)
//! - `POST /categories`, `DELETE /categories/{id}`,
//!   `PUT /categories/order` (bearer token)
//! - `POST /images` (bearer token)
//!
//! Failure injection: [`MockGateway::fail_reads`] makes GETs answer 500,
//! [`MockGateway::fail_writes`] does the same for writes, and
//! [`MockGateway::set_read_delay`] adds artificial latency for ordering
//! tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use cozy_hook_core::{CategoryId, ProductId};
use cozy_hook_store::gateway::types::{CategoryEntity, Product};

/// Admin token every test instance accepts.
pub const ADMIN_TOKEN: &str = "k2v9-wool-and-weft-88";

/// Shared state of one mock gateway instance.
pub struct MockState {
    products: Mutex<Vec<Product>>,
    categories: Mutex<Vec<CategoryEntity>>,
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_delay_ms: AtomicU64,
    write_delay_ms: AtomicU64,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An in-process gateway bound to an ephemeral port.
pub struct MockGateway {
    /// Base URL ending with a slash, ready for `StoreConfig::for_gateway`.
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockGateway {
    /// Spawn a gateway seeded with the given catalog.
    ///
    /// # Panics
    ///
    /// Panics if no ephemeral port can be bound.
    pub async fn spawn(products: Vec<Product>, categories: Vec<CategoryEntity>) -> Self {
        let state = Arc::new(MockState {
            products: Mutex::new(products),
            categories: Mutex::new(categories),
            uploads: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            read_delay_ms: AtomicU64::new(0),
            write_delay_ms: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        });

        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock gateway died");
        });

        Self {
            base_url: format!("http://{addr}/"),
            state,
        }
    }

    /// Make every read answer 500.
    pub fn fail_reads(&self, fail: bool) {
        self.state.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write answer 500.
    pub fn fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay read responses; applies to requests that arrive afterwards.
    pub fn set_read_delay(&self, delay: Duration) {
        self.state
            .read_delay_ms
            .store(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), Ordering::SeqCst);
    }

    /// Delay write responses; applies to requests that arrive afterwards.
    pub fn set_write_delay(&self, delay: Duration) {
        self.state
            .write_delay_ms
            .store(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), Ordering::SeqCst);
    }

    /// Replace the backing product rows.
    pub fn set_products(&self, products: Vec<Product>) {
        *lock(&self.state.products) = products;
    }

    /// Replace the backing category rows.
    pub fn set_categories(&self, categories: Vec<CategoryEntity>) {
        *lock(&self.state.categories) = categories;
    }

    /// Current backing category rows, in stored order.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryEntity> {
        lock(&self.state.categories).clone()
    }

    /// Uploaded images as `(file_name, decoded bytes)`.
    #[must_use]
    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        lock(&self.state.uploads).clone()
    }
}

// =============================================================================
// Router and handlers
// =============================================================================

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", axum::routing::delete(delete_product))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", axum::routing::delete(delete_category))
        .route("/categories/order", put(reorder_categories))
        .route("/images", post(upload_image))
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn require_admin(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let delay = state.write_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.fail_writes.load(Ordering::SeqCst) {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "injected write failure",
        ));
    }

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ADMIN_TOKEN}"));

    if authorized {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::UNAUTHORIZED,
            "invalid admin token",
        ))
    }
}

async fn read_gate(state: &MockState) -> Result<(), Response> {
    let delay = state.read_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if state.fail_reads.load(Ordering::SeqCst) {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "injected read failure",
        ));
    }
    Ok(())
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(e) = read_gate(&state).await {
        return e;
    }

    let products: Vec<Product> = lock(&state.products)
        .iter()
        .filter(|p| match params.get("type").map(String::as_str) {
            Some("featured") => p.featured,
            Some("banner") => p.banner,
            _ => true,
        })
        .filter(|p| params.get("category").is_none_or(|c| &p.category == c))
        .cloned()
        .collect();

    Json(products).into_response()
}

async fn list_categories(State(state): State<Arc<MockState>>) -> Response {
    if let Err(e) = read_gate(&state).await {
        return e;
    }
    Json(lock(&state.categories).clone()).into_response()
}

async fn create_product(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(e) = require_admin(&state, &headers).await {
        return e;
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let mut record = body;
    record["id"] = json!(format!("prod-{id}"));

    match serde_json::from_value::<Product>(record) {
        Ok(product) => {
            lock(&state.products).push(product.clone());
            Json(product).into_response()
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

async fn delete_product(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = require_admin(&state, &headers).await {
        return e;
    }
    let id = ProductId::new(id);
    lock(&state.products).retain(|p| p.id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn create_category(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(e) = require_admin(&state, &headers).await {
        return e;
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let mut record = body;
    record["id"] = json!(format!("cat-{id}"));

    match serde_json::from_value::<CategoryEntity>(record) {
        Ok(category) => {
            lock(&state.categories).push(category.clone());
            Json(category).into_response()
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

async fn delete_category(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = require_admin(&state, &headers).await {
        return e;
    }
    let id = CategoryId::new(id);
    lock(&state.categories).retain(|c| c.id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn reorder_categories(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(order): Json<Vec<Value>>,
) -> Response {
    if let Err(e) = require_admin(&state, &headers).await {
        return e;
    }

    let mut categories = lock(&state.categories);
    for entry in &order {
        let (Some(id), Some(sort_order)) = (entry["id"].as_str(), entry["sort_order"].as_i64())
        else {
            return error_response(StatusCode::BAD_REQUEST, "malformed order entry");
        };
        if let Some(category) = categories.iter_mut().find(|c| c.id.as_str() == id) {
            category.sort_order = sort_order;
        }
    }
    categories.sort_by_key(|c| c.sort_order);

    StatusCode::NO_CONTENT.into_response()
}

async fn upload_image(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(e) = require_admin(&state, &headers).await {
        return e;
    }

    let (Some(file_name), Some(data)) = (body["file_name"].as_str(), body["data"].as_str()) else {
        return error_response(StatusCode::BAD_REQUEST, "missing file_name or data");
    };

    let Ok(bytes) = BASE64.decode(data) else {
        return error_response(StatusCode::BAD_REQUEST, "data is not valid base64");
    };

    lock(&state.uploads).push((file_name.to_owned(), bytes));

    Json(json!({ "url": format!("https://cdn.test/public/{file_name}") })).into_response()
}

// =============================================================================
// Test data builders
// =============================================================================

/// A product row with the given id, title and category.
#[must_use]
pub fn product(id: &str, title: &str, category: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_owned(),
        price: cozy_hook_core::Price::from_cents(cents),
        image: format!("https://cdn.test/public/{id}.jpg"),
        images: Vec::new(),
        category: category.to_owned(),
        description: String::new(),
        stock: 2,
        tags: Vec::new(),
        featured: false,
        banner: false,
        banner_caption: None,
    }
}

/// A category row with the given id, name and sort order.
#[must_use]
pub fn category(id: &str, name: &str, sort_order: i64) -> CategoryEntity {
    CategoryEntity {
        id: CategoryId::new(id),
        name: name.to_owned(),
        sort_order,
        created_at: None,
    }
}

/// A scratch cart path unique to one test.
#[must_use]
pub fn scratch_cart_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("cozy-hook-it-cart-{}.json", uuid::Uuid::new_v4()))
}
