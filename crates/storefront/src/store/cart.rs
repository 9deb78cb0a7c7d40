//! Shopping cart state.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vitrine_core::{Price, Product, ProductId};

use super::{CART_KEY, SharedStorage, load_record, persist_record};

/// Sales tax applied to the subtotal (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// A product in the cart with its quantity.
///
/// Persists as the product's fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: NonZeroU32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity.get())
    }
}

/// Order totals shown alongside the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub subtotal: Price,
    /// Shipping is always free.
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl CartSummary {
    #[must_use]
    pub fn for_subtotal(subtotal: Price) -> Self {
        let shipping = Price::ZERO;
        let tax = subtotal.percent_of(TAX_RATE);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Summary for `subtotal`, or `None` if the total does not fit.
    #[must_use]
    pub fn checked_for_subtotal(subtotal: Price) -> Option<Self> {
        let tax = subtotal.percent_of(TAX_RATE);
        let total = subtotal.checked_add(tax)?;
        Some(Self {
            subtotal,
            shipping: Price::ZERO,
            tax,
            total,
        })
    }
}

/// Exact summary over `(unit price, quantity)` pairs, or `None` on overflow.
fn checked_summary(lines: impl IntoIterator<Item = (Price, u32)>) -> Option<CartSummary> {
    let subtotal = lines
        .into_iter()
        .try_fold(Price::ZERO, |acc, (price, quantity)| {
            acc.checked_add(price.checked_times(quantity)?)
        })?;
    CartSummary::checked_for_subtotal(subtotal)
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
    pub total_items: u64,
    pub summary: CartSummary,
}

/// The shopping cart.
///
/// Lines keep the order in which products were first added. There is at most
/// one line per product id, and the order total always fits in a [`Price`]:
/// lines that would overflow it are dropped on load and quantities are capped
/// on mutation.
pub struct CartStore {
    storage: SharedStorage,
    lines: Vec<CartLine>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart from storage. A missing or corrupt record yields an
    /// empty cart.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let lines = load_record::<Vec<CartLine>>(storage.as_ref(), CART_KEY)
            .map(merge_duplicate_lines)
            .map(drop_overflowing_lines)
            .unwrap_or_default();
        tracing::debug!(lines = lines.len(), "Cart loaded");
        Self { storage, lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity.get())).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::for_subtotal(self.total_price())
    }

    /// Add one unit of `product`. Appends a new line if the product is not
    /// already in the cart.
    ///
    /// The cart is left unchanged if one more unit would overflow the order
    /// total.
    pub fn add_to_cart(&mut self, product: Product) {
        let product_id = product.id;
        let (unit_price, quantity) = self
            .line(product_id)
            .map_or((product.price, NonZeroU32::MIN), |l| {
                (l.product.price, l.quantity.saturating_add(1))
            });
        if !self.fits(product_id, unit_price, quantity.get()) {
            tracing::warn!(%product_id, "Order total would overflow, not adding to cart");
            return;
        }

        match self.lines.iter_mut().find(|l| l.product_id() == product_id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine::new(product)),
        }
        tracing::debug!(%product_id, "Added to cart");
        self.persist();
    }

    /// Set the quantity of an existing line. A quantity of zero or less
    /// removes the line; unknown product ids are ignored.
    ///
    /// Quantities are capped at the largest value whose order total fits.
    pub fn update_quantity(&mut self, product_id: ProductId, new_quantity: i64) {
        if new_quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }

        let Some(unit_price) = self.line(product_id).map(|l| l.product.price) else {
            return;
        };
        let requested = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        let quantity = self.largest_fitting_quantity(product_id, unit_price, requested);
        if quantity < requested {
            tracing::warn!(%product_id, requested, quantity, "Capped cart quantity to fit the order total");
        }

        let Some(line) = self.lines.iter_mut().find(|l| l.product_id() == product_id) else {
            return;
        };
        line.quantity = NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN);
        tracing::debug!(%product_id, quantity, "Cart quantity updated");
        self.persist();
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id() != product_id);
        if self.lines.len() != before {
            tracing::debug!(%product_id, "Removed from cart");
            self.persist();
        }
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        tracing::debug!("Cart cleared");
        self.persist();
    }

    /// Place the order for the current cart and empty it.
    ///
    /// Returns `None` and leaves the cart untouched when it is empty.
    pub fn checkout(&mut self) -> Option<CheckoutReceipt> {
        if self.is_empty() {
            return None;
        }

        let receipt = CheckoutReceipt {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            total_items: self.total_items(),
            summary: self.summary(),
            lines: std::mem::take(&mut self.lines),
        };
        tracing::info!(
            order_id = %receipt.order_id,
            total_items = receipt.total_items,
            total = %receipt.summary.total,
            "Order placed"
        );
        self.persist();
        Some(receipt)
    }

    /// Whether the order total fits with `product_id` at `quantity` units.
    fn fits(&self, product_id: ProductId, unit_price: Price, quantity: u32) -> bool {
        let others = self
            .lines
            .iter()
            .filter(|l| l.product_id() != product_id)
            .map(|l| (l.product.price, l.quantity.get()));
        checked_summary(others.chain(std::iter::once((unit_price, quantity)))).is_some()
    }

    /// Binary search for the largest quantity up to `requested` that fits.
    /// One unit always fits for a line already in the cart.
    fn largest_fitting_quantity(
        &self,
        product_id: ProductId,
        unit_price: Price,
        requested: u32,
    ) -> u32 {
        if self.fits(product_id, unit_price, requested) {
            return requested;
        }
        let (mut fitting, mut overflowing) = (1, requested);
        while overflowing - fitting > 1 {
            let mid = fitting + (overflowing - fitting) / 2;
            if self.fits(product_id, unit_price, mid) {
                fitting = mid;
            } else {
                overflowing = mid;
            }
        }
        fitting
    }

    fn persist(&self) {
        persist_record(self.storage.as_ref(), CART_KEY, &self.lines);
    }
}

/// Fold repeated product ids into the first line, summing quantities.
fn merge_duplicate_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged
            .iter_mut()
            .find(|m| m.product_id() == line.product_id())
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity.get());
            }
            None => merged.push(line),
        }
    }
    merged
}

/// Keep lines in order while the running order total fits.
fn drop_overflowing_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut kept: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        let candidate = kept
            .iter()
            .chain(std::iter::once(&line))
            .map(|l| (l.product.price, l.quantity.get()));
        if checked_summary(candidate).is_some() {
            kept.push(line);
        } else {
            tracing::warn!(
                product_id = %line.product_id(),
                "Dropping persisted cart line whose total overflows"
            );
        }
    }
    kept
}
