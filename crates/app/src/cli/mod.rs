//! Command line interface.

use clap::{Parser, Subcommand};

use catalog_app::config::{LoggingConfig, StoreConfig};

mod enquiry;
mod products;
mod taxonomy;

#[derive(Debug, Parser)]
#[command(name = "catalog-app", about = "Catalog CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(flatten)]
    store: StoreConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List or delete products
    Products(products::ProductsCommand),

    /// Print the category, type and subtype tree
    Taxonomy,

    /// Build enquiry links
    Enquiry(enquiry::EnquiryCommand),
}

pub async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Products(command) => products::run(command, &cli.store).await,
        Commands::Taxonomy => taxonomy::run(),
        Commands::Enquiry(command) => enquiry::run(command, &cli.store).await,
    }
}
