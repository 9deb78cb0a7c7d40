//! Cart route handlers.
//!
//! Every mutation answers with the full cart snapshot so the front end can
//! redraw without a second request. Products are resolved through the
//! catalog before the cart lock is taken.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::{Price, Product, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::{CartLine, CartStore, CartSummary, CheckoutReceipt};

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product.clone(),
            quantity: line.quantity.get(),
            line_total: line.line_total(),
        }
    }
}

/// Cart snapshot with its order summary.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_items: u64,
    pub summary: CartSummary,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total_items: cart.total_items(),
            summary: cart.summary(),
        }
    }
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Request body naming a product.
#[derive(Debug, Deserialize)]
pub struct ProductIdBody {
    pub product_id: ProductId,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityBody {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Display cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().lock().await;
    Json(CartView::from(&*cart))
}

/// Total number of items in the cart.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountView> {
    let cart = state.cart().lock().await;
    Json(CartCountView {
        count: cart.total_items(),
    })
}

/// Add one unit of a catalog product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<ProductIdBody>,
) -> Result<Json<CartView>> {
    let product = state.catalog().try_fetch_product_by_id(body.product_id).await?;
    let product_id = product.id.to_string();

    let mut cart = state.cart().lock().await;
    cart.add_to_cart(product);
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    Ok(Json(CartView::from(&*cart)))
}

/// Set a line's quantity. Zero or less removes it.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<UpdateQuantityBody>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.update_quantity(body.product_id, body.quantity);

    let product_id = body.product_id.to_string();
    let quantity = body.quantity.to_string();
    add_breadcrumb(
        "cart",
        "Updated quantity",
        Some(&[("product_id", product_id.as_str()), ("quantity", quantity.as_str())]),
    );

    Json(CartView::from(&*cart))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<ProductIdBody>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.remove_from_cart(body.product_id);

    let product_id = body.product_id.to_string();
    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", product_id.as_str())]));

    Json(CartView::from(&*cart))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.clear_cart();
    add_breadcrumb("cart", "Cleared cart", None);
    Json(CartView::from(&*cart))
}

/// Place a simulated order for the current cart.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Json<CheckoutReceipt>> {
    let mut cart = state.cart().lock().await;
    let receipt = cart
        .checkout()
        .ok_or_else(|| AppError::BadRequest("Cart is empty".to_string()))?;

    let order_id = receipt.order_id.to_string();
    add_breadcrumb("cart", "Checked out", Some(&[("order_id", order_id.as_str())]));

    Ok(Json(receipt))
}
