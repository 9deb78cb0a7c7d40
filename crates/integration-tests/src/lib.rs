//! Integration tests for the Vitrine storefront API.
//!
//! Each test drives the full router in-process with `tower::ServiceExt::oneshot`
//! against a `mockito` catalog and in-memory storage; no network or disk is
//! touched.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Listing, search, categories, product detail
//! - `storefront_cart` - Cart mutations, totals, checkout, persistence
//! - `storefront_wishlist` - Wishlist events, move to cart, persistence

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;
use vitrine_storefront::config::{CatalogConfig, StorefrontConfig};
use vitrine_storefront::routes;
use vitrine_storefront::state::AppState;
use vitrine_storefront::storage::{LocalStorage, MemoryStorage};

/// Catalog fixture: three products across three categories.
pub const PRODUCTS: &str = r#"[
    {"id":1,"title":"Fjallraven Backpack","price":109.95,"description":"Fits 15 inch laptops","category":"men's clothing","image":"https://img.example/1.jpg","rating":{"rate":3.9,"count":120}},
    {"id":5,"title":"Dragon Chain Bracelet","price":695,"description":"Gold and silver","category":"jewelery","image":"https://img.example/5.jpg","rating":{"rate":4.6,"count":400}},
    {"id":9,"title":"WD 2TB Portable Drive","price":64,"description":"USB 3.0 external hard drive","category":"electronics","image":"https://img.example/9.jpg","rating":{"rate":3.3,"count":203}}
]"#;

/// Category fixture.
pub const CATEGORIES: &str = r#"["electronics","jewelery","men's clothing"]"#;

/// Product id the catalog answers with an empty body.
pub const UNKNOWN_PRODUCT: i64 = 99;

/// Product id the catalog answers with HTTP 500.
pub const BROKEN_PRODUCT: i64 = 7;

/// A storefront wired to a fake catalog and in-memory storage.
pub struct TestContext {
    pub server: ServerGuard,
    pub storage: MemoryStorage,
    pub app: Router,
    _mocks: Vec<Mock>,
}

impl TestContext {
    /// Start with empty storage.
    pub async fn new() -> Self {
        Self::with_storage(MemoryStorage::new()).await
    }

    /// Start with pre-populated storage.
    pub async fn with_storage(storage: MemoryStorage) -> Self {
        let mut server = mockito::Server::new_async().await;
        let mocks = catalog_mocks(&mut server).await;
        let app = build_app(&server, &storage);
        Self {
            server,
            storage,
            app,
            _mocks: mocks,
        }
    }

    /// A fresh app over the same storage and catalog, as after a restart.
    #[must_use]
    pub fn restart(&self) -> Router {
        build_app(&self.server, &self.storage)
    }

    /// GET `uri` and decode the response.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// POST `body` as JSON to `uri` and decode the response.
    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        post_to(&self.app, uri, body).await
    }

    /// Raw persisted record under `key`.
    #[must_use]
    pub fn persisted(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).unwrap()
    }
}

/// POST `body` as JSON to `uri` on `app`.
pub async fn post_to(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Run one request through `app`. Non-JSON bodies come back as strings.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Product ids of a JSON product array, in order.
#[must_use]
pub fn ids(products: &Value) -> Vec<i64> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

/// Assert a JSON money amount to the cent.
pub fn assert_money(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn build_app(server: &ServerGuard, storage: &MemoryStorage) -> Router {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        data_dir: "unused".into(),
        cors_origin: None,
        catalog: CatalogConfig {
            base_url: Url::parse(&server.url()).unwrap(),
            product_limit: 20,
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(60),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = AppState::new(config, Arc::new(storage.clone())).unwrap();
    routes::app(state)
}

fn json_mock(server: &mut ServerGuard, path: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
}

async fn catalog_mocks(server: &mut ServerGuard) -> Vec<Mock> {
    let products: Value = serde_json::from_str(PRODUCTS).unwrap();
    let mut mocks = Vec::new();

    mocks.push(
        json_mock(server, "/products", PRODUCTS)
            .match_query(Matcher::UrlEncoded("limit".into(), "20".into()))
            .create_async()
            .await,
    );
    mocks.push(
        json_mock(server, "/products/categories", CATEGORIES)
            .create_async()
            .await,
    );

    for product in products.as_array().unwrap() {
        let id = product["id"].as_i64().unwrap();
        mocks.push(
            json_mock(server, &format!("/products/{id}"), &product.to_string())
                .create_async()
                .await,
        );
    }

    for category in ["jewelery", "electronics"] {
        let members: Vec<&Value> = products
            .as_array()
            .unwrap()
            .iter()
            .filter(|p| p["category"] == category)
            .collect();
        mocks.push(
            json_mock(
                server,
                &format!("/products/category/{category}"),
                &serde_json::to_string(&members).unwrap(),
            )
            .create_async()
            .await,
        );
    }

    mocks.push(
        server
            .mock("GET", format!("/products/{UNKNOWN_PRODUCT}").as_str())
            .with_status(200)
            .with_body("")
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("GET", format!("/products/{BROKEN_PRODUCT}").as_str())
            .with_status(500)
            .create_async()
            .await,
    );

    mocks
}
