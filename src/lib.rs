//! Fragrance Finder
//!
//! Finds product photos of fragrance bottles on a web page, groups them into
//! product containers and overlays a hover button that searches Fragrantica
//! for the product. Runs as a wasm content script in the browser or over page
//! snapshots from the command line.

pub mod config;
pub mod detector;
pub mod dom;
pub mod error;
pub mod models;
pub mod overlay;
pub mod report;
pub mod scanner;
pub mod storage;
pub mod utils;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::ScanConfig;
pub use dom::{MemoryPage, PageDom};
pub use models::{ListItem, ListKind, ScanReport, ScanSummary};
pub use scanner::{ScanLoop, Scanner};

use anyhow::{Context, Result};
use models::ContainerSummary;
use overlay::ButtonController;
use std::path::Path;
use utils::search::search_url_with;

/// Load a page snapshot and run one scan pass over it
pub fn scan_snapshot(path: &Path, config: &ScanConfig) -> Result<ScanSummary> {
    let mut page = dom::load_snapshot(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;

    Ok(scan_page(path.display().to_string(), &mut page, config))
}

/// Run one scan pass over an in-memory page. Buttons stay mounted on `page`.
pub fn scan_page(source: impl Into<String>, page: &mut MemoryPage, config: &ScanConfig) -> ScanSummary {
    let scanner = Scanner::new(config);
    let mut buttons = ButtonController::new(config);
    let report = scanner.scan(page, &mut buttons);

    ScanSummary {
        source: source.into(),
        images_seen: report.images_seen,
        candidates: report.candidates,
        containers: report
            .containers
            .iter()
            .map(|container| ContainerSummary {
                element: page.describe(container.node),
                name: container.name.clone(),
                search_url: search_url_with(&config.search_url_template, &container.name),
                button_attached: container.button_attached,
            })
            .collect(),
    }
}
