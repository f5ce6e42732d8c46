//! Delimited-file export of ad records.
//!
//! Rows are raw joined lines; field values arrive pre-escaped by the
//! normalizer, so no quoting layer is needed. A UTF-8 BOM keeps spreadsheet
//! apps from mangling Cyrillic text.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use regex::Regex;
use tracing::info;

use crate::config::ScrapeConfig;
use crate::extract::fields::NOT_SPECIFIED;
use crate::extract::normalize::FIELD_DELIMITER;
use crate::extract::AdRecord;

/// Column set for a run. Chosen once, together with the run's
/// `RegionSource`; the two schemas are never mixed in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// {title, price, region, link} - region comes from the search request.
    RegionOverride,
    /// {title, price, location, date, link} - location scraped per ad.
    LocationExtracted,
}

impl Schema {
    fn columns(self) -> &'static [&'static str] {
        match self {
            Schema::RegionOverride => &["title", "price", "region", "link"],
            Schema::LocationExtracted => &["title", "price", "location", "date", "link"],
        }
    }

    fn row(self, record: &AdRecord) -> Vec<String> {
        match self {
            Schema::RegionOverride => vec![
                record.title.clone(),
                record.price.clone(),
                record.region_or_location.clone(),
                record.link.clone(),
            ],
            Schema::LocationExtracted => vec![
                record.title.clone(),
                record.price.clone(),
                record.region_or_location.clone(),
                record
                    .date
                    .clone()
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                record.link.clone(),
            ],
        }
    }
}

/// Write records to a timestamped delimited file under the data directory.
/// Returns the path of the written file. Callers skip empty record sets.
pub fn write_records(
    config: &ScrapeConfig,
    records: &[AdRecord],
    schema: Schema,
    query: &str,
    region_slug: &str,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(&config.data_dir)?;

    let filename = format!(
        "avito_{}_{}_{}.csv",
        sanitize_for_filename(query),
        region_slug,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = config.data_dir.join(filename);

    let delimiter = FIELD_DELIMITER.to_string();
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(schema.columns().join(delimiter.as_str()));
    for record in records {
        lines.push(schema.row(record).join(delimiter.as_str()));
    }

    let body = format!("\u{FEFF}{}\n", lines.join("\n"));
    fs::write(&path, body)?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Reduce a search query to a filesystem-safe filename fragment.
fn sanitize_for_filename(query: &str) -> String {
    let cleaned = match Regex::new(r"[^\w\s-]") {
        Ok(re) => re.replace_all(query, "").into_owned(),
        Err(_) => query.to_string(),
    };
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(30)
        .collect()
}
