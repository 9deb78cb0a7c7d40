//! Vitrine Core - Shared types library.
//!
//! This crate provides common types used across all Vitrine components:
//! - `storefront` - Catalog client, cart and wishlist stores, JSON API
//! - `cli` - Command-line front end over the same stores
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, catalog products, category
//!   filters and sort orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
