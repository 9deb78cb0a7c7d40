//! Cart behavior through the storefront API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use vitrine_integration_tests::{TestContext, UNKNOWN_PRODUCT, assert_money, post_to, send};
use vitrine_storefront::storage::{LocalStorage, MemoryStorage};

fn line_ids(cart: &serde_json::Value) -> Vec<i64> {
    cart["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["product"]["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_empty_cart() {
    let ctx = TestContext::new().await;

    let (status, cart) = ctx.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["lines"], json!([]));
    assert_eq!(cart["total_items"], 0);
    assert_money(&cart["summary"]["total"], 0.0);

    let (_, count) = ctx.get("/api/cart/count").await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_add_same_product_twice_merges_lines() {
    let ctx = TestContext::new().await;

    ctx.post("/api/cart/add", &json!({"product_id": 1})).await;
    let (status, cart) = ctx.post("/api/cart/add", &json!({"product_id": 1})).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(line_ids(&cart), vec![1]);
    assert_eq!(cart["lines"][0]["quantity"], 2);
    assert_money(&cart["lines"][0]["line_total"], 219.90);
    assert_eq!(cart["total_items"], 2);

    let summary = &cart["summary"];
    assert_money(&summary["subtotal"], 219.90);
    assert_money(&summary["shipping"], 0.0);
    assert_money(&summary["tax"], 11.00);
    assert_money(&summary["total"], 230.90);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .post("/api/cart/add", &json!({"product_id": UNKNOWN_PRODUCT}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = ctx.get("/api/cart").await;
    assert_eq!(cart["total_items"], 0);
}

#[tokio::test]
async fn test_update_quantity() {
    let ctx = TestContext::new().await;
    ctx.post("/api/cart/add", &json!({"product_id": 9})).await;

    let (_, cart) = ctx
        .post("/api/cart/update", &json!({"product_id": 9, "quantity": 3}))
        .await;
    assert_eq!(cart["lines"][0]["quantity"], 3);
    assert_money(&cart["summary"]["subtotal"], 192.0);

    // Unknown ids are ignored
    let (status, cart) = ctx
        .post("/api/cart/update", &json!({"product_id": 5, "quantity": 4}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(line_ids(&cart), vec![9]);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let ctx = TestContext::new().await;
    ctx.post("/api/cart/add", &json!({"product_id": 9})).await;
    ctx.post("/api/cart/add", &json!({"product_id": 1})).await;

    let (_, cart) = ctx
        .post("/api/cart/update", &json!({"product_id": 9, "quantity": 0}))
        .await;
    assert_eq!(line_ids(&cart), vec![1]);
    assert_eq!(cart["total_items"], 1);
    assert_money(&cart["summary"]["subtotal"], 109.95);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let ctx = TestContext::new().await;
    ctx.post("/api/cart/add", &json!({"product_id": 1})).await;
    ctx.post("/api/cart/add", &json!({"product_id": 5})).await;

    let (_, once) = ctx.post("/api/cart/remove", &json!({"product_id": 1})).await;
    let (status, twice) = ctx.post("/api/cart/remove", &json!({"product_id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(once, twice);
    assert_eq!(line_ids(&twice), vec![5]);
}

#[tokio::test]
async fn test_clear() {
    let ctx = TestContext::new().await;
    ctx.post("/api/cart/add", &json!({"product_id": 1})).await;

    let (_, cart) = ctx.post("/api/cart/clear", &json!({})).await;
    assert_eq!(cart["total_items"], 0);
    assert_eq!(ctx.persisted("cart").as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_checkout() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.post("/api/cart/checkout", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request: Cart is empty");

    ctx.post("/api/cart/add", &json!({"product_id": 5})).await;
    ctx.post("/api/cart/add", &json!({"product_id": 9})).await;

    let (status, receipt) = ctx.post("/api/cart/checkout", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["order_id"].as_str().unwrap().len(), 36);
    assert_eq!(receipt["total_items"], 2);
    assert_money(&receipt["summary"]["subtotal"], 759.0);
    assert_money(&receipt["summary"]["tax"], 37.95);

    let (_, cart) = ctx.get("/api/cart").await;
    assert_eq!(cart["total_items"], 0);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let ctx = TestContext::new().await;
    ctx.post("/api/cart/add", &json!({"product_id": 1})).await;
    ctx.post("/api/cart/add", &json!({"product_id": 1})).await;
    ctx.post("/api/cart/add", &json!({"product_id": 5})).await;

    let restarted = ctx.restart();
    let request = axum::http::Request::get("/api/cart")
        .body(axum::body::Body::empty())
        .unwrap();
    let (_, cart) = send(&restarted, request).await;
    assert_eq!(line_ids(&cart), vec![1, 5]);
    assert_eq!(cart["total_items"], 3);

    let (_, cart) = post_to(&restarted, "/api/cart/remove", &json!({"product_id": 1})).await;
    assert_eq!(line_ids(&cart), vec![5]);
}

#[tokio::test]
async fn test_corrupt_cart_record_starts_empty() {
    let storage = MemoryStorage::new();
    storage.set_item("cart", "{not json").unwrap();

    let ctx = TestContext::with_storage(storage).await;
    let (status, cart) = ctx.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["total_items"], 0);

    // The next mutation overwrites the corrupt record
    let (_, cart) = ctx.post("/api/cart/add", &json!({"product_id": 9})).await;
    assert_eq!(line_ids(&cart), vec![9]);
    assert!(ctx.persisted("cart").unwrap().starts_with('['));
}

#[tokio::test]
async fn test_malformed_request_body_is_rejected() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post("/api/cart/add", &json!({"id": 1})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

fn cart_record(lines: &[(i64, &str, u32)]) -> String {
    let lines: Vec<serde_json::Value> = lines
        .iter()
        .map(|&(id, price, quantity)| {
            json!({
                "id": id,
                "title": format!("Stored {id}"),
                "price": price.parse::<f64>().unwrap(),
                "description": "",
                "category": "jewelery",
                "image": "",
                "rating": {"rate": 4.0, "count": 1},
                "quantity": quantity,
            })
        })
        .collect();
    serde_json::to_string(&lines).unwrap()
}

#[tokio::test]
async fn test_overflowing_cart_record_is_served() {
    let storage = MemoryStorage::new();
    storage
        .set_item("cart", &cart_record(&[(1, "2", 3), (5, "5e28", 2)]))
        .unwrap();

    let ctx = TestContext::with_storage(storage).await;
    let (status, cart) = ctx.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(line_ids(&cart), vec![1]);
    assert_money(&cart["summary"]["total"], 6.3);
}

#[tokio::test]
async fn test_huge_quantity_is_capped() {
    let storage = MemoryStorage::new();
    storage
        .set_item("cart", &cart_record(&[(5, "1e20", 1)]))
        .unwrap();

    let ctx = TestContext::with_storage(storage).await;
    let (status, cart) = ctx
        .post(
            "/api/cart/update",
            &json!({"product_id": 5, "quantity": i64::MAX}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let quantity = cart["lines"][0]["quantity"].as_u64().unwrap();
    assert!(quantity > 1 && quantity < u64::from(u32::MAX));

    let (status, _) = ctx.get("/api/cart/count").await;
    assert_eq!(status, StatusCode::OK);
}
