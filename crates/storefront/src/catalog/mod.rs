//! Product catalog: the remote API client and listing logic built on it.
//!
//! # Architecture
//!
//! - The catalog API is the source of truth for products and categories;
//!   nothing is synced locally
//! - In-memory caching via `moka` for successful responses (5 minute TTL by
//!   default); failures are never cached
//! - Every fetch has a fallible `try_*` form and an infallible form that logs
//!   the error and degrades to an empty or absent result
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let products = client.fetch_products().await;
//! let jewelery = client
//!     .fetch_products_by_category(&CategoryFilter::parse("jewelery"))
//!     .await;
//! ```

pub mod browse;
mod cache;
mod client;

pub use browse::{ProductQuery, category_menu, list_products, search_products};
pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("Catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product 21".to_string());
        assert_eq!(err.to_string(), "Not found: product 21");

        let err = CatalogError::Status {
            status: 503,
            url: "https://fakestoreapi.com/products".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Catalog returned HTTP 503 for https://fakestoreapi.com/products"
        );
    }
}
