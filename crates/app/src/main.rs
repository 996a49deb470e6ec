//! Catalog Application CLI

use std::process;

use clap::Parser;

use catalog_app::{config, logging};

mod cli;

#[tokio::main]
pub async fn main() {
    config::load_dotenv();

    let cli = cli::Cli::parse();

    let result = match logging::init(&cli.logging) {
        Ok(()) => cli::run(cli).await,
        Err(error) => Err(format!("failed to initialise logging: {error}")),
    };

    if let Err(error) = result {
        #[expect(
            clippy::print_stderr,
            reason = "command failures are reported to the terminal, not the log"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
