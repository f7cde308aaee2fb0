// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]

//! Bronze loader CLI
//!
//! Extracts a month of SpaceX API data into DuckDB

use bronze_loader::cli::{Cli, Runner};
use clap::Parser;

#[tokio::main]
async fn main() {
    // A missing .env is normal outside development
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
