//! Wishlist route handlers.
//!
//! Membership changes answer with the notification the front end should
//! show, if any, plus the product's resulting membership.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use vitrine_core::{Product, ProductId};

use super::cart::{CartView, ProductIdBody};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::{self, WishlistEvent, WishlistEventKind, WishlistStore};

/// Wishlist snapshot.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<Product>,
    pub count: usize,
}

impl From<&WishlistStore> for WishlistView {
    fn from(wishlist: &WishlistStore) -> Self {
        Self {
            items: wishlist.items().to_vec(),
            count: wishlist.len(),
        }
    }
}

/// Toast notification for a membership change.
#[derive(Debug, Serialize)]
pub struct NotificationView {
    pub kind: WishlistEventKind,
    pub product_title: String,
    pub headline: &'static str,
    pub message: String,
}

impl From<WishlistEvent> for NotificationView {
    fn from(event: WishlistEvent) -> Self {
        Self {
            kind: event.kind,
            headline: event.headline(),
            message: event.message(),
            product_title: event.product_title,
        }
    }
}

/// Result of a wishlist mutation.
#[derive(Debug, Serialize)]
pub struct WishlistChangeView {
    pub event: Option<NotificationView>,
    pub in_wishlist: bool,
}

fn record_event(event: Option<&WishlistEvent>, product_id: ProductId) {
    if let Some(event) = event {
        let product_id = product_id.to_string();
        add_breadcrumb(
            "wishlist",
            event.headline(),
            Some(&[("product_id", product_id.as_str())]),
        );
    }
}

/// Display wishlist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    let wishlist = state.wishlist().lock().await;
    Json(WishlistView::from(&*wishlist))
}

/// Save a catalog product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<ProductIdBody>,
) -> Result<Json<WishlistChangeView>> {
    let mut wishlist = state.wishlist().lock().await;
    if wishlist.is_in_wishlist(body.product_id) {
        return Ok(Json(WishlistChangeView {
            event: None,
            in_wishlist: true,
        }));
    }
    drop(wishlist);

    let product = state.catalog().try_fetch_product_by_id(body.product_id).await?;

    wishlist = state.wishlist().lock().await;
    let event = wishlist.add_to_wishlist(product);
    record_event(event.as_ref(), body.product_id);

    Ok(Json(WishlistChangeView {
        event: event.map(NotificationView::from),
        in_wishlist: true,
    }))
}

/// Drop a saved product.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<ProductIdBody>,
) -> Json<WishlistChangeView> {
    let mut wishlist = state.wishlist().lock().await;
    let event = wishlist.remove_from_wishlist(body.product_id);
    record_event(event.as_ref(), body.product_id);

    Json(WishlistChangeView {
        event: event.map(NotificationView::from),
        in_wishlist: false,
    })
}

/// Remove if saved, otherwise save.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Json(body): Json<ProductIdBody>,
) -> Result<Json<WishlistChangeView>> {
    let mut wishlist = state.wishlist().lock().await;
    let saved = wishlist.get(body.product_id).cloned();
    let product = if let Some(saved) = saved {
        saved
    } else {
        drop(wishlist);
        let fetched = state.catalog().try_fetch_product_by_id(body.product_id).await?;
        wishlist = state.wishlist().lock().await;
        fetched
    };

    let event = wishlist.toggle_wishlist(product);
    record_event(Some(&event), body.product_id);

    Ok(Json(WishlistChangeView {
        in_wishlist: event.kind == WishlistEventKind::Added,
        event: Some(NotificationView::from(event)),
    }))
}

/// Add one unit of a saved product to the cart, keeping it saved.
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(body): Json<ProductIdBody>,
) -> Result<Json<CartView>> {
    let wishlist = state.wishlist().lock().await;
    let mut cart = state.cart().lock().await;

    if !store::add_saved_to_cart(&wishlist, &mut cart, body.product_id) {
        return Err(AppError::NotFound(format!(
            "product {} is not in the wishlist",
            body.product_id
        )));
    }
    let product_id = body.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added from wishlist",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Json(CartView::from(&*cart)))
}

/// Move a saved product into the cart.
#[instrument(skip(state))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    Json(body): Json<ProductIdBody>,
) -> Result<Json<CartView>> {
    let mut wishlist = state.wishlist().lock().await;
    let mut cart = state.cart().lock().await;

    let event = store::move_to_cart(&mut wishlist, &mut cart, body.product_id).ok_or_else(|| {
        AppError::NotFound(format!("product {} is not in the wishlist", body.product_id))
    })?;
    record_event(Some(&event), body.product_id);
    add_breadcrumb("cart", "Moved from wishlist", None);

    Ok(Json(CartView::from(&*cart)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_view_from_event() {
        let event = WishlistEvent {
            kind: WishlistEventKind::Added,
            product_title: "Gold Bracelet".to_string(),
        };

        let view = NotificationView::from(event);
        assert_eq!(view.headline, "Added to wishlist");
        assert_eq!(view.message, "Gold Bracelet added to your wishlist");
        assert_eq!(view.product_title, "Gold Bracelet");
    }
}
