//! Client-side state containers: the shopping cart and the wishlist.
//!
//! # Persistence
//!
//! Each store owns one record in [`LocalStorage`]: `"cart"` and `"wishlist"`.
//! The full state is written after every mutation that changes it, and read
//! once when the store is loaded. A missing record is an empty store. A
//! record that fails to parse is logged and discarded, never surfaced to the
//! caller. A failed write is logged and the in-memory state stays
//! authoritative for the rest of the session.
//!
//! # Derived values
//!
//! Totals are computed from the current lines on every read and are never
//! stored, so they cannot drift from the lines they summarize.

pub mod cart;
pub mod wishlist;

pub use cart::{CartLine, CartStore, CartSummary, CheckoutReceipt};
pub use wishlist::{WishlistEvent, WishlistEventKind, WishlistStore};

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use vitrine_core::ProductId;

use crate::storage::LocalStorage;

/// Storage handle shared between stores.
pub type SharedStorage = Arc<dyn LocalStorage>;

/// Storage key for the cart record.
pub const CART_KEY: &str = "cart";

/// Storage key for the wishlist record.
pub const WISHLIST_KEY: &str = "wishlist";

/// Read and parse the record under `key`.
///
/// Returns `None` for a missing, unreadable or corrupt record.
fn load_record<T: DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No persisted record, starting empty");
            return None;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted record, starting empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupt persisted record");
            None
        }
    }
}

/// Serialize `value` and write it under `key`. Failures are logged only.
fn persist_record<T: Serialize + ?Sized>(storage: &dyn LocalStorage, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to serialize state");
            return;
        }
    };

    if let Err(e) = storage.set_item(key, &json) {
        tracing::error!(key, error = %e, "Failed to persist state");
    }
}

/// Add one unit of a saved product to the cart. The product stays saved.
///
/// Returns `false` if the product is not in the wishlist, in which case the
/// cart does not change.
pub fn add_saved_to_cart(
    wishlist: &WishlistStore,
    cart: &mut CartStore,
    product_id: ProductId,
) -> bool {
    let Some(product) = wishlist.get(product_id) else {
        return false;
    };
    cart.add_to_cart(product.clone());
    true
}

/// Add a saved product to the cart, then drop it from the wishlist.
///
/// Returns the wishlist's `Removed` event, or `None` if the product was not
/// saved, in which case neither store changes.
pub fn move_to_cart(
    wishlist: &mut WishlistStore,
    cart: &mut CartStore,
    product_id: ProductId,
) -> Option<WishlistEvent> {
    if !add_saved_to_cart(wishlist, cart, product_id) {
        return None;
    }
    wishlist.remove_from_wishlist(product_id)
}

#[cfg(test)]
pub(crate) mod test_support {
    use vitrine_core::{Price, Product, ProductId, Rating};

    use crate::storage::{LocalStorage, StorageError};

    /// Storage that reads nothing and rejects every write.
    pub struct ReadOnlyStorage;

    impl LocalStorage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    pub fn product(id: i64, cents: u64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            description: format!("Description of product {id}"),
            category: "electronics".to_string(),
            image_url: format!("https://img.example/{id}.jpg"),
            rating: Rating {
                rate: 4.0,
                count: 10,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn stores() -> (WishlistStore, CartStore) {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        (
            WishlistStore::load(Arc::clone(&storage)),
            CartStore::load(storage),
        )
    }

    #[test]
    fn test_add_saved_to_cart_keeps_item_saved() {
        let (mut wishlist, mut cart) = stores();
        wishlist.add_to_wishlist(test_support::product(4, 1500));

        assert!(add_saved_to_cart(&wishlist, &mut cart, ProductId::new(4)));
        assert!(add_saved_to_cart(&wishlist, &mut cart, ProductId::new(4)));
        assert!(wishlist.is_in_wishlist(ProductId::new(4)));
        assert_eq!(cart.total_items(), 2);

        assert!(!add_saved_to_cart(&wishlist, &mut cart, ProductId::new(5)));
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_failed_writes_keep_in_memory_state() {
        let storage: SharedStorage = Arc::new(test_support::ReadOnlyStorage);
        let mut cart = CartStore::load(Arc::clone(&storage));
        let mut wishlist = WishlistStore::load(storage);

        cart.add_to_cart(test_support::product(1, 1000));
        cart.add_to_cart(test_support::product(1, 1000));
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), vitrine_core::Price::from_cents(2000));

        let added = wishlist.toggle_wishlist(test_support::product(2, 500));
        assert_eq!(added.kind, WishlistEventKind::Added);
        assert!(wishlist.is_in_wishlist(ProductId::new(2)));

        let removed = wishlist.toggle_wishlist(test_support::product(2, 500));
        assert_eq!(removed.kind, WishlistEventKind::Removed);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_move_to_cart() {
        let (mut wishlist, mut cart) = stores();
        wishlist.add_to_wishlist(test_support::product(4, 1500));

        let event = move_to_cart(&mut wishlist, &mut cart, ProductId::new(4)).unwrap();
        assert_eq!(event.kind, WishlistEventKind::Removed);
        assert!(wishlist.is_empty());
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_move_to_cart_unknown_is_noop() {
        let (mut wishlist, mut cart) = stores();
        wishlist.add_to_wishlist(test_support::product(4, 1500));

        assert!(move_to_cart(&mut wishlist, &mut cart, ProductId::new(5)).is_none());
        assert_eq!(wishlist.len(), 1);
        assert!(cart.is_empty());
    }
}
