//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::store::{CartStore, SharedStorage, WishlistStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart and wishlist are the
/// single session for this storefront's data directory; handlers lock them
/// only around synchronous mutations, never across a catalog request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    storage: SharedStorage,
    cart: Mutex<CartStore>,
    wishlist: Mutex<WishlistStore>,
}

impl AppState {
    /// Create a new application state, loading the persisted cart and
    /// wishlist from `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, storage: SharedStorage) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let cart = CartStore::load(Arc::clone(&storage));
        let wishlist = WishlistStore::load(Arc::clone(&storage));

        tracing::info!(
            cart_items = cart.total_items(),
            wishlist_items = wishlist.len(),
            "Session state loaded"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
                cart: Mutex::new(cart),
                wishlist: Mutex::new(wishlist),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the backing storage.
    #[must_use]
    pub fn storage(&self) -> &SharedStorage {
        &self.inner.storage
    }

    /// The shopping cart.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartStore> {
        &self.inner.cart
    }

    /// The wishlist.
    #[must_use]
    pub fn wishlist(&self) -> &Mutex<WishlistStore> {
        &self.inner.wishlist
    }
}
