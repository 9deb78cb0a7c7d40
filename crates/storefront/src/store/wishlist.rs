//! Wishlist state.
//!
//! A wishlist is a set of saved products keyed by id, kept in the order they
//! were saved. Mutators return a [`WishlistEvent`] when membership actually
//! changes so the front end can notify the user; they never notify on their
//! own.

use serde::{Deserialize, Serialize};
use vitrine_core::{Product, ProductId};

use super::{SharedStorage, WISHLIST_KEY, load_record, persist_record};

/// What happened to a product's wishlist membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistEventKind {
    Added,
    Removed,
}

/// Notification emitted by a wishlist mutation that changed membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEvent {
    pub kind: WishlistEventKind,
    pub product_title: String,
}

impl WishlistEvent {
    fn added(product: &Product) -> Self {
        Self {
            kind: WishlistEventKind::Added,
            product_title: product.title.clone(),
        }
    }

    fn removed(product: &Product) -> Self {
        Self {
            kind: WishlistEventKind::Removed,
            product_title: product.title.clone(),
        }
    }

    /// Short headline, e.g. "Added to wishlist".
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self.kind {
            WishlistEventKind::Added => "Added to wishlist",
            WishlistEventKind::Removed => "Removed from wishlist",
        }
    }

    /// Full sentence naming the product.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            WishlistEventKind::Added => format!("{} added to your wishlist", self.product_title),
            WishlistEventKind::Removed => {
                format!("{} removed from your wishlist", self.product_title)
            }
        }
    }
}

/// The wishlist.
pub struct WishlistStore {
    storage: SharedStorage,
    items: Vec<Product>,
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl WishlistStore {
    /// Load the wishlist from storage. A missing or corrupt record yields an
    /// empty wishlist; repeated ids keep their first occurrence.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let mut items = load_record::<Vec<Product>>(storage.as_ref(), WISHLIST_KEY)
            .unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        items.retain(|p| seen.insert(p.id));
        tracing::debug!(items = items.len(), "Wishlist loaded");
        Self { storage, items }
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Save `product`. Returns `None` if it was already saved.
    pub fn add_to_wishlist(&mut self, product: Product) -> Option<WishlistEvent> {
        if self.is_in_wishlist(product.id) {
            return None;
        }
        let event = WishlistEvent::added(&product);
        tracing::debug!(product_id = %product.id, "Added to wishlist");
        self.items.push(product);
        self.persist();
        Some(event)
    }

    /// Drop `product_id`. Returns `None` if it was not saved.
    pub fn remove_from_wishlist(&mut self, product_id: ProductId) -> Option<WishlistEvent> {
        let index = self.items.iter().position(|p| p.id == product_id)?;
        let removed = self.items.remove(index);
        tracing::debug!(%product_id, "Removed from wishlist");
        self.persist();
        Some(WishlistEvent::removed(&removed))
    }

    /// Remove `product` if saved, otherwise save it. Exactly one event is
    /// returned.
    pub fn toggle_wishlist(&mut self, product: Product) -> WishlistEvent {
        if let Some(event) = self.remove_from_wishlist(product.id) {
            return event;
        }
        let added = WishlistEvent::added(&product);
        self.add_to_wishlist(product).unwrap_or(added)
    }

    fn persist(&self) {
        persist_record(self.storage.as_ref(), WISHLIST_KEY, &self.items);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::storage::{LocalStorage, MemoryStorage};
    use crate::store::test_support::product;

    fn empty_wishlist() -> (MemoryStorage, WishlistStore) {
        let storage = MemoryStorage::new();
        let wishlist = WishlistStore::load(Arc::new(storage.clone()));
        (storage, wishlist)
    }

    #[test]
    fn test_add_twice_keeps_one_copy_and_one_event() {
        let (_, mut wishlist) = empty_wishlist();
        let first = wishlist.add_to_wishlist(product(1, 100));
        let second = wishlist.add_to_wishlist(product(1, 100));

        assert_eq!(
            first,
            Some(WishlistEvent {
                kind: WishlistEventKind::Added,
                product_title: "Product 1".to_string(),
            })
        );
        assert_eq!(second, None);
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_remove_carries_removed_title() {
        let (_, mut wishlist) = empty_wishlist();
        wishlist.add_to_wishlist(product(4, 100));
        let event = wishlist.remove_from_wishlist(ProductId::new(4)).unwrap();

        assert_eq!(event.kind, WishlistEventKind::Removed);
        assert_eq!(event.product_title, "Product 4");
        assert_eq!(event.message(), "Product 4 removed from your wishlist");
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (storage, mut wishlist) = empty_wishlist();
        assert_eq!(wishlist.remove_from_wishlist(ProductId::new(1)), None);
        assert_eq!(storage.get_item(WISHLIST_KEY).unwrap(), None);
    }

    #[test]
    fn test_toggle_alternates() {
        let (_, mut wishlist) = empty_wishlist();
        let added = wishlist.toggle_wishlist(product(2, 100));
        assert_eq!(added.kind, WishlistEventKind::Added);
        assert!(wishlist.is_in_wishlist(ProductId::new(2)));

        let removed = wishlist.toggle_wishlist(product(2, 100));
        assert_eq!(removed.kind, WishlistEventKind::Removed);
        assert!(!wishlist.is_in_wishlist(ProductId::new(2)));
    }

    #[test]
    fn test_persists_products_without_quantity() {
        let (storage, mut wishlist) = empty_wishlist();
        wishlist.add_to_wishlist(product(1, 100));

        let raw = storage.get_item(WISHLIST_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert!(value[0].get("quantity").is_none());

        let reloaded = WishlistStore::load(Arc::new(storage));
        assert!(reloaded.is_in_wishlist(ProductId::new(1)));
    }

    #[test]
    fn test_corrupt_record_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(WISHLIST_KEY, "[{\"id\": \"oops\"}]").unwrap();
        let wishlist = WishlistStore::load(Arc::new(storage));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = WishlistEvent {
            kind: WishlistEventKind::Added,
            product_title: "Mug".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"], "added");
        assert_eq!(value["productTitle"], "Mug");
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_is_identity(
            saved in proptest::collection::vec(1i64..8, 0..8),
            target in 1i64..8,
        ) {
            let (_, mut wishlist) = empty_wishlist();
            for id in saved {
                wishlist.add_to_wishlist(product(id, 100));
            }
            let before: Vec<ProductId> = wishlist.items().iter().map(|p| p.id).collect();
            let was_saved = wishlist.is_in_wishlist(ProductId::new(target));

            let first = wishlist.toggle_wishlist(product(target, 100));
            let second = wishlist.toggle_wishlist(product(target, 100));
            prop_assert_ne!(first.kind, second.kind);

            let after: Vec<ProductId> = wishlist.items().iter().map(|p| p.id).collect();
            prop_assert_eq!(wishlist.is_in_wishlist(ProductId::new(target)), was_saved);
            let mut sorted_before = before;
            let mut sorted_after = after;
            sorted_before.sort();
            sorted_after.sort();
            prop_assert_eq!(sorted_before, sorted_after);
        }
    }
}
