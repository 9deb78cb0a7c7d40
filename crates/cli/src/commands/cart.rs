//! Cart commands.

use vitrine_core::ProductId;
use vitrine_storefront::routes::cart::CartView;
use vitrine_storefront::store::CartStore;

use super::{CliError, Context, render_cart};

fn load(ctx: &Context) -> CartStore {
    CartStore::load(ctx.storage.clone())
}

fn emit_cart(ctx: &Context, cart: &CartStore) -> Result<(), CliError> {
    ctx.emit(&CartView::from(cart), render_cart)
}

/// `vitrine cart show`
pub fn show(ctx: &Context) -> Result<(), CliError> {
    emit_cart(ctx, &load(ctx))
}

/// `vitrine cart add <id>`
pub async fn add(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let product = ctx.catalog.try_fetch_product_by_id(id).await?;
    let mut cart = load(ctx);
    cart.add_to_cart(product);
    emit_cart(ctx, &cart)
}

/// `vitrine cart update <id> <quantity>`
pub fn update(ctx: &Context, id: ProductId, quantity: i64) -> Result<(), CliError> {
    let mut cart = load(ctx);
    cart.update_quantity(id, quantity);
    emit_cart(ctx, &cart)
}

/// `vitrine cart remove <id>`
pub fn remove(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let mut cart = load(ctx);
    cart.remove_from_cart(id);
    emit_cart(ctx, &cart)
}

/// `vitrine cart clear`
pub fn clear(ctx: &Context) -> Result<(), CliError> {
    let mut cart = load(ctx);
    cart.clear_cart();
    emit_cart(ctx, &cart)
}

/// `vitrine cart checkout`
pub fn checkout(ctx: &Context) -> Result<(), CliError> {
    let mut cart = load(ctx);
    let receipt = cart.checkout().ok_or(CliError::EmptyCart)?;
    ctx.emit(&receipt, |r| {
        format!(
            "Order {} placed at {}\n{} items, total {}\n",
            r.order_id,
            r.placed_at.to_rfc3339(),
            r.total_items,
            r.summary.total
        )
    })
}
