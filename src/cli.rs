//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use console::style;

use crate::config::{region_slug, ScrapeConfig};
use crate::export::{self, Schema};
use crate::extract::RegionSource;
use crate::scrape::{self, SearchRequest};

#[derive(Parser)]
#[command(name = "avito-scrape")]
#[command(about = "Avito classified-ads scraper")]
#[command(version)]
pub struct Cli {
    /// Search query, e.g. "ноутбуки"
    #[arg(short, long)]
    query: String,

    /// Region (Russian name or URL slug)
    #[arg(short, long, default_value = "moskva")]
    region: String,

    /// Minimum price filter
    #[arg(long)]
    min_price: Option<u64>,

    /// Maximum price filter
    #[arg(long)]
    max_price: Option<u64>,

    /// Maximum number of listing pages to fetch
    #[arg(short = 'p', long, default_value = "3")]
    max_pages: u32,

    /// Scrape each ad's location and date from the page instead of
    /// stamping records with the search region
    #[arg(long)]
    extract_location: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the first page's HTML for selector debugging
    #[arg(long)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Parse arguments and run one scrape.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ScrapeConfig::load(cli.config.as_deref())?;

    let region_display = cli.region.trim().to_string();
    let (region_source, schema) = if cli.extract_location {
        (RegionSource::Extracted, Schema::LocationExtracted)
    } else {
        (
            RegionSource::Override(region_display.clone()),
            Schema::RegionOverride,
        )
    };

    let request = SearchRequest {
        query: cli.query.clone(),
        region_slug: region_slug(&cli.region),
        region_source,
        min_price: cli.min_price,
        max_price: cli.max_price,
        max_pages: cli.max_pages,
        dump_first_page: cli.debug,
    };

    println!(
        "{} Searching \"{}\" in {} (up to {} pages)",
        style("→").cyan(),
        cli.query,
        region_display,
        cli.max_pages
    );

    let records = scrape::run_search(&config, &request).await?;

    if records.is_empty() {
        println!("{} No ads found", style("✗").red());
        return Ok(());
    }

    let path = export::write_records(&config, &records, schema, &cli.query, &request.region_slug)?;
    println!(
        "{} {} ads saved to {}",
        style("✓").green(),
        records.len(),
        path.display()
    );

    for (i, record) in records.iter().take(3).enumerate() {
        println!(
            "{}. {} — {} — {}",
            i + 1,
            truncate(&record.title, 50),
            record.price,
            record.region_or_location
        );
    }

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
