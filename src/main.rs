//! avito-scrape - Avito classified-ads scraper.
//!
//! Fetches search-result pages strictly one at a time, extracts structured
//! ad records from unstable, versioned listing HTML, and writes them to a
//! delimited file.

mod cli;
mod config;
mod export;
mod extract;
mod scrape;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "avito_scrape=info"
    } else {
        "avito_scrape=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
