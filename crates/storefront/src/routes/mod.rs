//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (storage round trip)
//!
//! # Catalog
//! GET  /api/products              - Listing (?q=&category=&sort=)
//! GET  /api/products/{id}         - Product detail
//! GET  /api/categories            - Category menu
//! GET  /api/search                - Search results (?q=)
//!
//! # Cart
//! GET  /api/cart                  - Cart with order summary
//! GET  /api/cart/count            - Total items
//! POST /api/cart/add              - Add one unit {product_id}
//! POST /api/cart/update           - Set quantity {product_id, quantity}
//! POST /api/cart/remove           - Remove line {product_id}
//! POST /api/cart/clear            - Empty the cart
//! POST /api/cart/checkout         - Simulated checkout
//!
//! # Wishlist
//! GET  /api/wishlist              - Saved products
//! POST /api/wishlist/add          - Save {product_id}
//! POST /api/wishlist/remove       - Unsave {product_id}
//! POST /api/wishlist/toggle       - Toggle {product_id}
//! POST /api/wishlist/add-to-cart  - Add to cart, keep saved {product_id}
//! POST /api/wishlist/move-to-cart - Move into cart {product_id}
//! ```

pub mod cart;
pub mod products;
pub mod wishlist;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Storage key written by the readiness probe.
const READY_PROBE_KEY: &str = "ready-probe";

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/search", get(products::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/checkout", post(cart::checkout))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/toggle", post(wishlist::toggle))
        .route("/add-to-cart", post(wishlist::add_to_cart))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// All routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest(
            "/api",
            catalog_routes()
                .nest("/cart", cart_routes())
                .nest("/wishlist", wishlist_routes()),
        )
}

/// The complete application: routes, state and middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = state.config().cors_origin.as_deref().and_then(cors_layer);

    let mut router = routes()
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }));

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    // Sentry layers (outermost for full request coverage)
    router
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS for a single browser origin.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        Err(e) => {
            tracing::warn!(origin, error = %e, "Ignoring invalid CORS origin");
            None
        }
    }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Writes, reads back and removes a probe record. Returns 503 Service
/// Unavailable if storage cannot complete the round trip.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let storage = Arc::clone(state.storage());
    let probe = tokio::task::spawn_blocking(move || {
        storage.set_item(READY_PROBE_KEY, "ok")?;
        let read = storage.get_item(READY_PROBE_KEY)?;
        storage.remove_item(READY_PROBE_KEY)?;
        Ok::<_, crate::storage::StorageError>(read.as_deref() == Some("ok"))
    })
    .await;

    match probe {
        Ok(Ok(true)) => StatusCode::OK,
        Ok(Ok(false)) => {
            tracing::warn!("Readiness probe read back unexpected value");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(e) => {
            tracing::error!(error = %e, "Readiness probe task failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
