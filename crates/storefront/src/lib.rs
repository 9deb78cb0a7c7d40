//! Vitrine storefront library.
//!
//! Catalog browsing against a remote product API, plus a locally persisted
//! shopping cart and wishlist. The `vitrine-storefront` binary serves this
//! as a JSON API; the CLI drives the same stores directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
