//! Scan configuration
//!
//! Every field has a default matching the shipped extension, so a config file
//! only needs the values it overrides. Files are JSON5 so they may carry comments.

use crate::error::{Error, Result};
use crate::utils::search::FRAGRANTICA_SEARCH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "logo", "icon", "avatar", "menu", "button", "nav", "header", "footer",
    "social", "share", "cart", "search", "close", "arrow", "chevron",
];

pub const DEFAULT_INCLUDE_KEYWORDS: &[&str] = &[
    "cologne", "perfume", "fragrance", "bottle", "scent",
    "eau de toilette", "eau de parfum", "edt", "edp", "product",
];

pub const DEFAULT_CONTAINER_CLASSES: &[&str] = &["product", "image", "photo"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Images below this width or height are never candidates
    pub min_size: f64,
    /// Images at least this large are candidates without keyword evidence
    pub large_size: f64,
    pub exclude_keywords: Vec<String>,
    pub include_keywords: Vec<String>,
    /// Class tokens marking an ancestor as a product container
    pub container_classes: Vec<String>,
    pub debounce_ms: u64,
    pub delayed_rescan_ms: u64,
    pub periodic_rescan_ms: u64,
    pub search_url_template: String,
    pub button_label: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_size: 100.0,
            large_size: 150.0,
            exclude_keywords: to_strings(DEFAULT_EXCLUDE_KEYWORDS),
            include_keywords: to_strings(DEFAULT_INCLUDE_KEYWORDS),
            container_classes: to_strings(DEFAULT_CONTAINER_CLASSES),
            debounce_ms: 100,
            delayed_rescan_ms: 2_000,
            periodic_rescan_ms: 20_000,
            search_url_template: FRAGRANTICA_SEARCH.to_string(),
            button_label: "Fragrantica".to_string(),
        }
    }
}

impl ScanConfig {
    /// Parse a JSON5 document
    pub fn from_json5(content: &str) -> Result<Self> {
        let config: ScanConfig = json5::from_str(content)
            .map_err(|e| Error::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json5(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.min_size < 0.0 || self.large_size < self.min_size {
            return Err(Error::Config(format!(
                "size thresholds must satisfy 0 <= min_size ({}) <= large_size ({})",
                self.min_size, self.large_size
            )));
        }

        if self.periodic_rescan_ms == 0 {
            return Err(Error::Config("periodic_rescan_ms must be positive".to_string()));
        }

        if !self.search_url_template.contains("{query}") {
            return Err(Error::Config("search_url_template must contain {query}".to_string()));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn delayed_rescan(&self) -> Duration {
        Duration::from_millis(self.delayed_rescan_ms)
    }

    pub fn periodic_rescan(&self) -> Duration {
        Duration::from_millis(self.periodic_rescan_ms)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
