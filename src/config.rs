//! Run configuration and region-name translation.
//!
//! Configuration is loaded once at startup and passed by reference into the
//! scrape driver and assembler; there is no ambient mutable state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Russian region name -> Avito URL slug.
pub const REGIONS: &[(&str, &str)] = &[
    ("москва", "moskva"),
    ("санкт-петербург", "sankt-peterburg"),
    ("екатеринбург", "ekaterinburg"),
    ("новосибирск", "novosibirsk"),
    ("казань", "kazan"),
    ("нур-султан", "nur-sultan"),
    ("минск", "minsk"),
    ("киев", "kiev"),
];

/// Translate a region name to its URL slug. Unknown names pass through
/// lowercased, assumed to already be a slug.
pub fn region_slug(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    REGIONS
        .iter()
        .find(|(russian, _)| *russian == lower)
        .map(|(_, slug)| (*slug).to_string())
        .unwrap_or(lower)
}

/// Scraper configuration from an optional TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Base origin for search URLs and relative-link resolution.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Delay after every page fetch, in seconds. The origin site rate-limits
    /// aggressively; sequential, delayed access is a hard requirement.
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: u64,
    /// Additional delay between listing pages, in seconds.
    #[serde(default = "default_page_delay")]
    pub page_delay_secs: u64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Directory for exported files and debug artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_delay_secs: default_request_delay(),
            page_delay_secs: default_page_delay(),
            timeout_secs: default_timeout(),
            data_dir: default_data_dir(),
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a TOML file. With no explicit path, reads
    /// `avito-scrape.toml` from the working directory when present and falls
    /// back to defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let candidate = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("avito-scrape.toml"));

        if candidate.exists() {
            let raw = fs::read_to_string(&candidate)?;
            let config = toml::from_str(&raw)?;
            Ok(config)
        } else if path.is_some() {
            anyhow::bail!("config file not found: {}", candidate.display())
        } else {
            Ok(Self::default())
        }
    }
}

fn default_base_url() -> String {
    "https://www.avito.ru".to_string()
}
fn default_request_delay() -> u64 {
    2
}
fn default_page_delay() -> u64 {
    1
}
fn default_timeout() -> u64 {
    15
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
