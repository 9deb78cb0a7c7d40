//! Catalog API client implementation.
//!
//! Plain REST over `reqwest` against a Fake Store API compatible service.
//! Caches products and categories using `moka`.

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use vitrine_core::{CategoryFilter, Product, ProductId};

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use crate::config::CatalogConfig;

/// Client for the product catalog API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    product_limit: u32,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                product_limit: config.product_limit,
                cache,
            }),
        })
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Returns `CatalogError::NotFound` for an empty or `null` body, which is
    /// how the catalog answers lookups of unknown ids.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "Catalog returned non-success status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(CatalogError::NotFound(url));
        }

        serde_json::from_str(trimmed).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %trimmed.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Fallible fetches
    // =========================================================================

    /// Fetch the product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn try_fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let path = format!("/products?limit={}", self.inner.product_limit);
        let products: Vec<Product> = self.get_json(&path).await?;
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product,
    /// or another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn try_fetch_product_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&format!("/products/{id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Fetch the category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn try_fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<String> = self.get_json("/products/categories").await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Fetch the products in `category`. [`CategoryFilter::All`] is the full
    /// product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn try_fetch_products_by_category(
        &self,
        category: &CategoryFilter,
    ) -> Result<Vec<Product>, CatalogError> {
        let CategoryFilter::Named(name) = category else {
            return self.try_fetch_products().await;
        };

        let cache_key = CacheKey::Category(name.clone());
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(products);
        }

        let path = format!("/products/category/{}", urlencoding::encode(name));
        let products: Vec<Product> = self.get_json(&path).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Degrading fetches
    // =========================================================================

    /// Fetch the product listing; empty on failure.
    pub async fn fetch_products(&self) -> Vec<Product> {
        self.try_fetch_products().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Error fetching products");
            Vec::new()
        })
    }

    /// Fetch a single product; `None` if it does not exist or on failure.
    pub async fn fetch_product_by_id(&self, id: ProductId) -> Option<Product> {
        match self.try_fetch_product_by_id(id).await {
            Ok(product) => Some(product),
            Err(CatalogError::NotFound(_)) => {
                debug!(product_id = %id, "Product not found");
                None
            }
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "Error fetching product");
                None
            }
        }
    }

    /// Fetch the category names; empty on failure.
    pub async fn fetch_categories(&self) -> Vec<String> {
        self.try_fetch_categories().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Error fetching categories");
            Vec::new()
        })
    }

    /// Fetch the products in `category`; empty on failure.
    pub async fn fetch_products_by_category(&self, category: &CategoryFilter) -> Vec<Product> {
        self.try_fetch_products_by_category(category)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(category = %category, error = %e, "Error fetching category products");
                Vec::new()
            })
    }
}
