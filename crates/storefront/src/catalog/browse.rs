//! Client-side filtering and sorting of catalog listings.
//!
//! The catalog API only knows how to list everything or list one category.
//! Text search and sort order are applied here, in memory, on the fetched
//! listing.

use serde::{Deserialize, Serialize};
use vitrine_core::{CategoryFilter, Product, ProductSort};

use super::CatalogClient;

/// Listing parameters, as taken from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Free-text search over title, description and category.
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductQuery {
    /// The normalized search needle, or `None` when there is nothing to match.
    #[must_use]
    pub fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Filter `products` by the search text, then sort.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut products = match self.needle() {
            Some(needle) => products
                .into_iter()
                .filter(|p| p.matches_lowercase(&needle))
                .collect(),
            None => products,
        };
        self.sort.sort(&mut products);
        products
    }
}

/// The product listing for `query`.
pub async fn list_products(client: &CatalogClient, query: &ProductQuery) -> Vec<Product> {
    let products = client.fetch_products_by_category(&query.category).await;
    let listed = query.apply(products);
    tracing::debug!(
        category = %query.category,
        sort = query.sort.as_str(),
        count = listed.len(),
        "Listed products"
    );
    listed
}

/// Search results for `query` across the whole catalog, in catalog order.
///
/// Unlike [`list_products`], a blank query yields no results.
pub async fn search_products(client: &CatalogClient, query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    client
        .fetch_products()
        .await
        .into_iter()
        .filter(|p| p.matches_lowercase(&needle))
        .collect()
}

/// Category menu entries: `"all"` first, then the catalog's categories.
#[must_use]
pub fn category_menu(categories: &[String]) -> Vec<CategoryFilter> {
    let mut menu = Vec::with_capacity(categories.len() + 1);
    if !categories.iter().any(|c| c == CategoryFilter::ALL) {
        menu.push(CategoryFilter::All);
    }
    menu.extend(categories.iter().map(|c| CategoryFilter::parse(c)));
    menu
}
