//! Product, category and search route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::{CategoryFilter, Product, ProductId, ProductSort};

use crate::catalog::{self, ProductQuery};
use crate::error::Result;
use crate::state::AppState;

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListView {
    pub products: Vec<Product>,
    pub count: usize,
    pub category: CategoryFilter,
    pub sort: ProductSort,
}

/// Category menu entry.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub slug: String,
    pub name: String,
}

impl From<&CategoryFilter> for CategoryView {
    fn from(filter: &CategoryFilter) -> Self {
        Self {
            slug: filter.as_str().to_string(),
            name: filter.display_name(),
        }
    }
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchView {
    pub query: String,
    pub products: Vec<Product>,
    pub count: usize,
}

/// Browse listing, filtered and sorted.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductListView> {
    let products = catalog::list_products(state.catalog(), &query).await;
    Json(ProductListView {
        count: products.len(),
        products,
        category: query.category,
        sort: query.sort,
    })
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state.catalog().try_fetch_product_by_id(id).await?;
    Ok(Json(product))
}

/// Category menu with "all" first.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<CategoryView>> {
    let categories = state.catalog().fetch_categories().await;
    let menu = catalog::category_menu(&categories)
        .iter()
        .map(CategoryView::from)
        .collect();
    Json(menu)
}

/// Search results. A blank query returns nothing.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchView> {
    let products = catalog::search_products(state.catalog(), &query.q).await;
    Json(SearchView {
        query: query.q.trim().to_string(),
        count: products.len(),
        products,
    })
}
