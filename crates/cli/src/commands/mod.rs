//! Subcommand implementations.
//!
//! Each command loads the stores it needs from the data directory, applies
//! one operation and prints the result. Text output goes to stdout; logs go
//! to stderr.

pub mod cart;
pub mod catalog;
pub mod wishlist;

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use vitrine_core::{Product, ProductId};
use vitrine_storefront::catalog::{CatalogClient, CatalogError};
use vitrine_storefront::config::{ConfigError, StorefrontConfig};
use vitrine_storefront::routes::cart::CartView;
use vitrine_storefront::storage::FileStorage;
use vitrine_storefront::store::SharedStorage;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The product is not in the wishlist.
    #[error("Product {0} is not in the wishlist")]
    NotInWishlist(ProductId),

    /// Checkout was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,
}

/// Shared command context.
pub struct Context {
    pub catalog: CatalogClient,
    pub storage: SharedStorage,
    pub json: bool,
}

impl Context {
    /// Build the context from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_env(json: bool) -> Result<Self, CliError> {
        let config = StorefrontConfig::from_env()?;
        tracing::debug!(data_dir = %config.data_dir.display(), "Using file storage");
        Ok(Self {
            catalog: CatalogClient::new(&config.catalog)?,
            storage: Arc::new(FileStorage::new(config.data_dir)),
            json,
        })
    }

    /// Print `value` as JSON, or the text from `render`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    #[allow(clippy::print_stdout)]
    pub fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        render: impl FnOnce(&T) -> String,
    ) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", render(value));
        }
        Ok(())
    }
}

/// One-line product summary.
pub fn product_line(product: &Product) -> String {
    format!(
        "#{:<4} {:>10}  {:.1}★  {}",
        product.id,
        product.price.to_string(),
        product.rating.rate,
        product.title
    )
}

/// Product list, one per line, with a trailing count.
pub fn render_products(products: &[Product]) -> String {
    let mut out = String::new();
    for product in products {
        let _ = writeln!(out, "{}", product_line(product));
    }
    let noun = if products.len() == 1 { "product" } else { "products" };
    let _ = writeln!(out, "{} {noun}", products.len());
    out
}

/// Cart lines followed by the order summary.
pub fn render_cart(cart: &CartView) -> String {
    let mut out = String::new();
    if cart.lines.is_empty() {
        out.push_str("Cart is empty\n");
        return out;
    }
    for line in &cart.lines {
        let _ = writeln!(
            out,
            "{:>3} x {}  = {}",
            line.quantity,
            product_line(&line.product),
            line.line_total
        );
    }
    let summary = &cart.summary;
    let _ = writeln!(out, "Items:    {}", cart.total_items);
    let _ = writeln!(out, "Subtotal: {}", summary.subtotal);
    let _ = writeln!(out, "Shipping: Free");
    let _ = writeln!(out, "Tax:      {}", summary.tax);
    let _ = writeln!(out, "Total:    {}", summary.total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{Price, Rating};
    use vitrine_storefront::storage::MemoryStorage;
    use vitrine_storefront::store::CartStore;

    fn product(id: i64, cents: u64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Item {id}"),
            price: Price::from_cents(cents),
            description: String::new(),
            category: "electronics".to_string(),
            image_url: String::new(),
            rating: Rating {
                rate: 4.25,
                count: 3,
            },
        }
    }

    #[test]
    fn test_product_line() {
        let line = product_line(&product(7, 1999));
        assert!(line.starts_with("#7 "));
        assert!(line.contains("$19.99"));
        assert!(line.ends_with("Item 7"));
    }

    #[test]
    fn test_render_products_counts() {
        assert!(render_products(&[]).ends_with("0 products\n"));
        assert!(render_products(&[product(1, 100)]).ends_with("1 product\n"));
    }

    #[test]
    fn test_render_cart() {
        let mut cart = CartStore::load(Arc::new(MemoryStorage::new()));
        assert_eq!(render_cart(&CartView::from(&cart)), "Cart is empty\n");

        cart.add_to_cart(product(1, 10000));
        cart.add_to_cart(product(1, 10000));
        let text = render_cart(&CartView::from(&cart));
        assert!(text.contains("Subtotal: $200.00"));
        assert!(text.contains("Tax:      $10.00"));
        assert!(text.contains("Total:    $210.00"));
    }
}
