//! Sequential page-loop driver for listing searches.
//!
//! Pages are fetched and processed strictly one at a time, in page order,
//! with mandatory delays in between. Nothing here runs concurrently: the
//! origin site's anti-scraping posture makes rate-limited sequential access
//! a design requirement.

mod http_client;

pub use http_client::HttpClient;

use std::path::PathBuf;
use std::time::Duration;

use scraper::Html;
use tracing::{info, warn};
use urlencoding::encode;

use crate::config::ScrapeConfig;
use crate::extract::{self, AdRecord, RegionSource};

/// Fatal scrape failures. Anything past the first page degrades to
/// skip-and-continue instead of aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to fetch the first results page: {0}")]
    FirstPage(#[source] reqwest::Error),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Search parameters for one scrape run.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub region_slug: String,
    /// Region handling mode, fixed for the whole run.
    pub region_source: RegionSource,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub max_pages: u32,
    /// Dump the first page's HTML even when extraction succeeds.
    pub dump_first_page: bool,
}

impl SearchRequest {
    /// Build the listing URL for one page of this search.
    fn page_url(&self, config: &ScrapeConfig, page: u32) -> String {
        let mut url = format!(
            "{}/{}?q={}",
            config.base_url.trim_end_matches('/'),
            self.region_slug,
            encode(&self.query)
        );
        if let Some(pmin) = self.min_price {
            url.push_str(&format!("&pmin={}", pmin));
        }
        if let Some(pmax) = self.max_price {
            url.push_str(&format!("&pmax={}", pmax));
        }
        url.push_str(&format!("&p={}", page));
        url
    }
}

/// Run a search across listing pages and collect every extracted record.
///
/// Stops when the page limit is reached, a page yields no records, or a page
/// with records carries no next-page marker. The marker is only consulted
/// after a page yielded at least one record.
pub async fn run_search(
    config: &ScrapeConfig,
    request: &SearchRequest,
) -> Result<Vec<AdRecord>, ScrapeError> {
    let client = HttpClient::new(
        &config.base_url,
        Duration::from_secs(config.timeout_secs),
        Duration::from_secs(config.request_delay_secs),
    )
    .map_err(ScrapeError::Client)?;

    let mut all_records = Vec::new();

    for page in 1..=request.max_pages {
        let url = request.page_url(config, page);
        info!("Page {}: {}", page, url);

        let html = match client.get_text(&url).await {
            Ok(html) => html,
            Err(e) if page == 1 => return Err(ScrapeError::FirstPage(e)),
            Err(e) => {
                warn!("Skipping page {}: {}", page, e);
                continue;
            }
        };

        let document = Html::parse_document(&html);

        if request.dump_first_page && page == 1 {
            dump_debug_page(config, &document);
        }

        let records = extract::assemble(&document, config, &request.region_source);
        if records.is_empty() {
            info!("No ads on page {}, stopping", page);
            if !request.dump_first_page {
                // Keep the raw page around for selector-rule maintenance
                dump_debug_page(config, &document);
            }
            break;
        }

        info!("Page {}: {} ads", page, records.len());
        all_records.extend(records);

        if !extract::has_next_page(&document) {
            info!("No next-page marker, this was the last page");
            break;
        }

        tokio::time::sleep(Duration::from_secs(config.page_delay_secs)).await;
    }

    Ok(all_records)
}

/// Save the raw page under the data directory for selector debugging.
fn dump_debug_page(config: &ScrapeConfig, document: &Html) {
    let path: PathBuf = config.data_dir.join("debug_page.html");
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        warn!("Failed to create {}: {}", config.data_dir.display(), e);
        return;
    }
    match std::fs::write(&path, document.root_element().html()) {
        Ok(()) => info!("Saved raw page to {}", path.display()),
        Err(e) => warn!("Failed to save debug page: {}", e),
    }
}
