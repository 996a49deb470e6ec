//! `products` subcommands.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use catalog::{
    fixtures::{Fixture, demo_catalog},
    listing::write_table,
    normalize::Normalizer,
    products::{Product, ProductId},
    query::{CatalogQuery, CategoryFilter, SortBy, TypeFilter},
};
use clap::{Args, Subcommand};

use catalog_app::{
    admin::Confirmation,
    auth::Identity,
    config::StoreConfig,
    context::AppContext,
    storefront::CatalogSource,
};

#[derive(Debug, Args)]
pub struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products the way the storefront shows them
    List(ListArgs),

    /// Permanently delete a product
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Category slug, or "all"
    #[arg(long, default_value = "all")]
    category: CategoryFilter,

    /// Towel product type; only applies to towels
    #[arg(long = "type")]
    product_type: Option<String>,

    /// Subtype, or type for products without a subtype
    #[arg(long)]
    subtype: Option<String>,

    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    search: String,

    /// Ordering (newest, name, price-low, price-high)
    #[arg(long, default_value = "newest")]
    sort: SortBy,

    /// List the bundled demonstration catalog instead of the store
    #[arg(long, conflicts_with = "fixture")]
    demo: bool,

    /// List a YAML catalog file instead of the store
    #[arg(long)]
    fixture: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    /// Product identifier
    #[arg(long)]
    id: String,

    /// Confirm the deletion; without it nothing is deleted
    #[arg(long)]
    yes: bool,
}

pub async fn run(command: ProductsCommand, store: &StoreConfig) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => list(args, store).await,
        ProductsSubcommand::Delete(args) => delete(args, store).await,
    }
}

async fn list(args: ListArgs, store: &StoreConfig) -> Result<(), String> {
    let products = load(&args, store).await?;

    let criteria = CatalogQuery::new()
        .with_category(args.category)
        .with_product_type(args.product_type.unwrap_or_default())
        .with_selected_type(args.subtype.map_or(TypeFilter::All, TypeFilter::Named))
        .with_search(args.search)
        .sorted_by(args.sort);

    write_table(io::stdout().lock(), criteria.apply(&products))
        .map_err(|error| format!("failed to write listing: {error}"))
}

async fn load(args: &ListArgs, store: &StoreConfig) -> Result<Vec<Product>, String> {
    let normalizer = Normalizer::default();

    if args.demo {
        return demo_catalog(&normalizer)
            .map(Fixture::into_products)
            .map_err(|error| format!("failed to load demo catalog: {error}"));
    }

    if let Some(path) = &args.fixture {
        return Fixture::from_path(path, &normalizer)
            .map(Fixture::into_products)
            .map_err(|error| format!("failed to load {}: {error}", path.display()));
    }

    let context = AppContext::from_config(store).map_err(|error| error.to_string())?;

    let catalog = context
        .storefront()
        .load()
        .await
        .map_err(|error| format!("failed to load catalog: {error}"))?;

    if let CatalogSource::Demo { reason } = catalog.source() {
        tracing::warn!(?reason, "store listing unavailable, listing demo catalog");
    }

    Ok(catalog.products().to_vec())
}

async fn delete(args: DeleteArgs, store: &StoreConfig) -> Result<(), String> {
    let context = AppContext::from_config(store).map_err(|error| error.to_string())?;
    let operator = Identity::new("cli", store.admin_email.clone());
    let admin = context.admin(Some(&operator));

    admin.load().await.map_err(|error| error.to_string())?;

    let id = ProductId::new(args.id);
    let confirmation = if args.yes {
        Confirmation::Confirmed
    } else {
        Confirmation::Declined
    };

    let deleted = admin
        .delete(&id, confirmation)
        .await
        .map_err(|error| error.to_string())?;

    let mut out = io::stdout().lock();

    let written = if deleted {
        writeln!(out, "deleted product {id}")
    } else {
        writeln!(out, "product {id} kept; pass --yes to confirm deletion")
    };

    written.map_err(|error| error.to_string())
}
