//! Ad extraction core: container location, field extraction, record assembly.
//!
//! Everything here is pure computation over an already-fetched document; the
//! transport, CLI, and file-writing collaborators live elsewhere. Extraction
//! tolerates total failure: a page where nothing matches produces an empty
//! record set, never an error.

pub mod fields;
pub mod locate;
pub mod normalize;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::config::ScrapeConfig;
use fields::Field;

/// Pagination marker present on every non-final listing page.
const NEXT_PAGE_SELECTOR: &str = "a[data-marker=\"pagination-next\"]";

/// One extracted classified ad. All required fields hold non-empty text;
/// sentinels stand in for anything the page did not expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdRecord {
    pub title: String,
    pub price: String,
    /// Search region (override mode) or scraped address (extraction mode).
    pub region_or_location: String,
    /// Listing date; populated only in location-extraction mode.
    pub date: Option<String>,
    pub link: String,
}

/// Where the region/location field of a record comes from. Chosen once per
/// run; the two modes produce different export schemas and are never mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSource {
    /// Trust the caller's search region; location markup is ignored.
    Override(String),
    /// Trust the page's own address markup.
    Extracted,
}

#[derive(Debug, thiserror::Error)]
enum ContainerError {
    #[error("container exposed no recognizable ad markup")]
    NoAdMarkup,
}

/// Assemble ad records from one listing page.
///
/// Locates containers once, then runs field extraction and normalization per
/// container. A container with an unexpected shape is skipped with a warning
/// and never aborts the rest of the page. An empty result signals the caller
/// that the raw page may be worth preserving for selector maintenance.
pub fn assemble(
    document: &Html,
    config: &ScrapeConfig,
    region: &RegionSource,
) -> Vec<AdRecord> {
    let containers = locate::locate(document);
    let mut records = Vec::with_capacity(containers.len());

    for container in &containers {
        match record_from_container(container, config, region) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping ad container: {}", e),
        }
    }

    records
}

/// Whether the page carries a "next page" marker. Callers consult this only
/// after the current page yielded at least one record.
pub fn has_next_page(document: &Html) -> bool {
    match Selector::parse(NEXT_PAGE_SELECTOR) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    }
}

fn record_from_container(
    container: &ElementRef<'_>,
    config: &ScrapeConfig,
    region: &RegionSource,
) -> Result<AdRecord, ContainerError> {
    let title = fields::extract(container, Field::Title);
    let mut price = fields::extract(container, Field::Price);
    let link = fields::extract_link(container, &config.base_url);

    // The generic `article` fallback can match non-ad nodes. A container
    // where every lookup defaulted is such a node, not a sparse ad.
    if title == fields::NO_TITLE && price == fields::NO_PRICE && link == fields::NO_LINK {
        return Err(ContainerError::NoAdMarkup);
    }

    if price != fields::NO_PRICE {
        price = normalize::normalize_price(&price);
        if price.is_empty() {
            price = fields::NO_PRICE.to_string();
        }
    }

    let (region_or_location, date) = match region {
        RegionSource::Override(name) => (name.clone(), None),
        RegionSource::Extracted => (
            fields::extract(container, Field::Location),
            Some(fields::extract(container, Field::Date)),
        ),
    };

    Ok(AdRecord {
        title: normalize::escape_field(&title),
        price: normalize::escape_field(&price),
        region_or_location: normalize::escape_field(&region_or_location),
        date: date.map(|d| normalize::escape_field(&d)),
        link: normalize::escape_field(&link),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ScrapeConfig {
        ScrapeConfig {
            base_url: "https://example.test".to_string(),
            ..ScrapeConfig::default()
        }
    }

    const TWO_AD_PAGE: &str = r#"<html><body>
        <div data-marker="item">
            <a data-marker="item-title" title="Ноутбук" href="/items/1">Ноутбук</a>
            <meta itemprop="price" content="45000">
            <div data-marker="item-address">Москва, Арбат</div>
            <div data-marker="item-date">вчера</div>
        </div>
        <div data-marker="item">
            <a data-marker="item-title" title="Диван" href="/items/2">Диван</a>
            <span data-marker="item-price">12 000 ₽</span>
        </div>
    </body></html>"#;

    #[test]
    fn test_assemble_region_override() {
        let document = Html::parse_document(TWO_AD_PAGE);
        let region = RegionSource::Override("Екатеринбург".to_string());
        let records = assemble(&document, &test_config(), &region);

        assert_eq!(records.len(), 2);
        // Override wins regardless of address markup in the containers
        for record in &records {
            assert_eq!(record.region_or_location, "Екатеринбург");
            assert!(record.date.is_none());
        }
        assert_eq!(records[0].title, "Ноутбук");
        assert_eq!(records[0].price, "45000");
        assert_eq!(records[0].link, "https://example.test/items/1");
        assert_eq!(records[1].price, "12 000");
    }

    #[test]
    fn test_assemble_location_extracted() {
        let document = Html::parse_document(TWO_AD_PAGE);
        let records = assemble(&document, &test_config(), &RegionSource::Extracted);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region_or_location, "Москва, Арбат");
        assert_eq!(records[0].date.as_deref(), Some("вчера"));
        // Second container has no address or date markup
        assert_eq!(records[1].region_or_location, fields::NOT_SPECIFIED);
        assert_eq!(records[1].date.as_deref(), Some(fields::NOT_SPECIFIED));
    }

    #[test]
    fn test_assemble_empty_page() {
        let document = Html::parse_document("<html><body><p>пусто</p></body></html>");
        let region = RegionSource::Override("Москва".to_string());
        assert!(assemble(&document, &test_config(), &region).is_empty());
    }

    #[test]
    fn test_assemble_skips_markup_free_container() {
        // The article fallback matches both nodes; the second exposes no ad
        // markup at all and is dropped without aborting the first.
        let document = Html::parse_document(
            r#"<html><body>
                <article>
                    <h3 itemprop="name">Стол</h3>
                    <span class="price">3 500 ₽</span>
                </article>
                <article><p>реклама</p></article>
            </body></html>"#,
        );
        let region = RegionSource::Override("Казань".to_string());
        let records = assemble(&document, &test_config(), &region);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Стол");
    }

    #[test]
    fn test_assemble_escapes_delimiters_in_title() {
        let document = Html::parse_document(
            r#"<html><body>
                <div data-marker="item">
                    <a data-marker="item-title" title="Шкаф; самовывоз" href="/items/3">t</a>
                </div>
            </body></html>"#,
        );
        let region = RegionSource::Override("Минск".to_string());
        let records = assemble(&document, &test_config(), &region);
        assert_eq!(records[0].title, "Шкаф, самовывоз");
    }

    #[test]
    fn test_has_next_page() {
        let with_marker = Html::parse_document(
            r#"<html><body><a data-marker="pagination-next" href="?p=2">next</a></body></html>"#,
        );
        assert!(has_next_page(&with_marker));

        let without = Html::parse_document("<html><body></body></html>");
        assert!(!has_next_page(&without));
    }
}
