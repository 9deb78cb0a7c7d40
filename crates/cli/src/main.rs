//! Vitrine CLI - browse the catalog and manage the local cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! vitrine products --category jewelery --sort price-asc
//! vitrine search "backpack"
//! vitrine product 3
//!
//! # Cart
//! vitrine cart add 3
//! vitrine cart update 3 2
//! vitrine cart checkout
//!
//! # Wishlist
//! vitrine wishlist toggle 5
//! vitrine wishlist add-to-cart 5
//! vitrine wishlist move-to-cart 5
//! ```
//!
//! The cart and wishlist live in `VITRINE_DATA_DIR` (default `.vitrine`),
//! the same records the storefront server uses. Pass `--json` for machine
//! readable output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use vitrine_core::ProductId;

mod commands;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine storefront CLI")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Case-insensitive text to match
        #[arg(short, long)]
        search: Option<String>,

        /// Category name, or "all"
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Sort order: `rating` (Best Rating), `price-asc` (Price: Low to
        /// High) or `price-desc` (Price: High to Low)
        #[arg(long, default_value = "rating")]
        sort: String,
    },
    /// List catalog categories
    Categories,
    /// Show one product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Search the whole catalog
    Search {
        /// Text to match
        query: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Set a line's quantity (0 or less removes it)
    Update {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { id: ProductId },
    /// Remove every line
    Clear,
    /// Place a simulated order
    Checkout,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add { id: ProductId },
    /// Unsave a product
    Remove { id: ProductId },
    /// Save if absent, unsave if present
    Toggle { id: ProductId },
    /// Add a saved product to the cart and keep it saved
    AddToCart { id: ProductId },
    /// Move a saved product into the cart
    MoveToCart { id: ProductId },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::from_env(cli.json)?;

    match cli.command {
        Commands::Products {
            search,
            category,
            sort,
        } => commands::catalog::products(&ctx, search, &category, &sort).await?,
        Commands::Categories => commands::catalog::categories(&ctx).await?,
        Commands::Product { id } => commands::catalog::product(&ctx, id).await?,
        Commands::Search { query } => commands::catalog::search(&ctx, &query).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx)?,
            CartAction::Add { id } => commands::cart::add(&ctx, id).await?,
            CartAction::Update { id, quantity } => commands::cart::update(&ctx, id, quantity)?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, id)?,
            CartAction::Clear => commands::cart::clear(&ctx)?,
            CartAction::Checkout => commands::cart::checkout(&ctx)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&ctx)?,
            WishlistAction::Add { id } => commands::wishlist::add(&ctx, id).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&ctx, id)?,
            WishlistAction::Toggle { id } => commands::wishlist::toggle(&ctx, id).await?,
            WishlistAction::AddToCart { id } => commands::wishlist::add_to_cart(&ctx, id)?,
            WishlistAction::MoveToCart { id } => commands::wishlist::move_to_cart(&ctx, id)?,
        },
    }
    Ok(())
}
