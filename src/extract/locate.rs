//! Ad-container location on a search-results page.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Candidate container selectors, newest markup generation first.
///
/// Avito has gone through several redesigns; each entry corresponds to one
/// generation of listing markup. The generic `article` fallback stays last.
/// New generations are supported by appending a row, not by editing code.
pub const CONTAINER_SELECTORS: &[&str] = &[
    "div[data-marker=\"item\"]",
    "div.iva-item-root",
    "div.items-item",
    "div.js-item",
    "article",
];

/// Locate ad containers in a parsed page.
///
/// Selectors are tried in priority order and the first one yielding at least
/// one match wins. Results from different markup generations are never
/// merged: mixing them risks duplicate or malformed rows. An empty result is
/// a normal "no ads on this page" outcome, not an error.
pub fn locate(document: &Html) -> Vec<ElementRef<'_>> {
    for selector_str in CONTAINER_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };

        let matches: Vec<ElementRef<'_>> = document.select(&selector).collect();
        if !matches.is_empty() {
            debug!(
                "Found {} containers with selector '{}'",
                matches.len(),
                selector_str
            );
            return matches;
        }
    }

    Vec::new()
}
