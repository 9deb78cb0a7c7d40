//! Wishlist commands.

use serde::Serialize;
use vitrine_core::{Product, ProductId};
use vitrine_storefront::routes::cart::CartView;
use vitrine_storefront::store::{self, CartStore, WishlistEvent, WishlistStore};

use super::{CliError, Context, render_cart, render_products};

fn load(ctx: &Context) -> WishlistStore {
    WishlistStore::load(ctx.storage.clone())
}

/// Outcome of a membership change.
#[derive(Serialize)]
struct Change {
    event: Option<WishlistEvent>,
    in_wishlist: bool,
}

fn render_change(change: &Change) -> String {
    match &change.event {
        Some(event) => format!("{}: {}\n", event.headline(), event.message()),
        None if change.in_wishlist => "Already in your wishlist\n".to_string(),
        None => "Not in your wishlist\n".to_string(),
    }
}

/// `vitrine wishlist show`
pub fn show(ctx: &Context) -> Result<(), CliError> {
    let wishlist = load(ctx);
    ctx.emit(wishlist.items(), render_products)
}

/// `vitrine wishlist add <id>`
pub async fn add(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let mut wishlist = load(ctx);
    let event = if wishlist.is_in_wishlist(id) {
        None
    } else {
        let product = ctx.catalog.try_fetch_product_by_id(id).await?;
        wishlist.add_to_wishlist(product)
    };
    ctx.emit(
        &Change {
            event,
            in_wishlist: true,
        },
        render_change,
    )
}

/// `vitrine wishlist remove <id>`
pub fn remove(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let event = load(ctx).remove_from_wishlist(id);
    ctx.emit(
        &Change {
            event,
            in_wishlist: false,
        },
        render_change,
    )
}

/// `vitrine wishlist toggle <id>`
pub async fn toggle(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let mut wishlist = load(ctx);
    let product: Product = match wishlist.get(id).cloned() {
        Some(saved) => saved,
        None => ctx.catalog.try_fetch_product_by_id(id).await?,
    };
    let event = wishlist.toggle_wishlist(product);
    let in_wishlist = wishlist.is_in_wishlist(id);
    ctx.emit(
        &Change {
            event: Some(event),
            in_wishlist,
        },
        render_change,
    )
}

/// `vitrine wishlist add-to-cart <id>`
pub fn add_to_cart(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let wishlist = load(ctx);
    let mut cart = CartStore::load(ctx.storage.clone());
    if !store::add_saved_to_cart(&wishlist, &mut cart, id) {
        return Err(CliError::NotInWishlist(id));
    }
    ctx.emit(&CartView::from(&cart), render_cart)
}

/// `vitrine wishlist move-to-cart <id>`
pub fn move_to_cart(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let mut wishlist = load(ctx);
    let mut cart = CartStore::load(ctx.storage.clone());
    store::move_to_cart(&mut wishlist, &mut cart, id).ok_or(CliError::NotInWishlist(id))?;
    ctx.emit(&CartView::from(&cart), render_cart)
}
