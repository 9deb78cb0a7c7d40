//! Catalog browsing commands.

use vitrine_core::{CategoryFilter, ProductId, ProductSort};
use vitrine_storefront::catalog::{self, ProductQuery};

use super::{CliError, Context, product_line, render_products};

/// `vitrine products`
pub async fn products(
    ctx: &Context,
    search: Option<String>,
    category: &str,
    sort: &str,
) -> Result<(), CliError> {
    let query = ProductQuery {
        search,
        category: CategoryFilter::parse(category),
        sort: ProductSort::parse(sort),
    };
    let products = catalog::list_products(&ctx.catalog, &query).await;
    ctx.emit(products.as_slice(), |products| {
        format!("Sorted by {}\n{}", query.sort.label(), render_products(products))
    })
}

/// `vitrine categories`
pub async fn categories(ctx: &Context) -> Result<(), CliError> {
    let categories = ctx.catalog.fetch_categories().await;
    let menu = catalog::category_menu(&categories);
    ctx.emit(menu.as_slice(), |menu| {
        menu.iter()
            .map(|c| format!("{:<20} {}\n", c.as_str(), c.display_name()))
            .collect()
    })
}

/// `vitrine product <id>`
pub async fn product(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let product = ctx.catalog.try_fetch_product_by_id(id).await?;
    ctx.emit(&product, |p| {
        format!(
            "{}\n{}  ({})\n\n{}\n",
            product_line(p),
            p.category,
            p.image_url,
            p.description
        )
    })
}

/// `vitrine search <query>`
pub async fn search(ctx: &Context, query: &str) -> Result<(), CliError> {
    let products = catalog::search_products(&ctx.catalog, query).await;
    ctx.emit(products.as_slice(), render_products)
}
