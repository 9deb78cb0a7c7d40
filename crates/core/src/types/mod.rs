//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;
pub mod sort;

pub use category::CategoryFilter;
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Product, Rating};
pub use sort::ProductSort;
