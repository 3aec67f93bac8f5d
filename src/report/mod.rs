//! Report generation

pub mod generator;

pub use generator::generate_markdown_report;

use crate::models::ScanSummary;
use anyhow::Result;

pub fn generate_report(summaries: &[ScanSummary]) -> Result<String> {
    generate_markdown_report(summaries)
}
