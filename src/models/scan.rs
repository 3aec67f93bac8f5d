//! Results of a scan pass

use serde::Serialize;

/// One container handled during a pass
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedContainer<N> {
    pub node: N,
    pub name: String,
    pub button_attached: bool,
}

/// Outcome of one discovery pass over the page
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport<N> {
    pub images_seen: usize,
    pub candidates: usize,
    pub containers: Vec<ProcessedContainer<N>>,
}

impl<N> Default for ScanReport<N> {
    fn default() -> Self {
        Self {
            images_seen: 0,
            candidates: 0,
            containers: Vec::new(),
        }
    }
}

impl<N> ScanReport<N> {
    pub fn buttons_attached(&self) -> usize {
        self.containers.iter().filter(|c| c.button_attached).count()
    }
}

/// Host-independent rendering of a scan, used for CLI output and reports
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub source: String,
    pub images_seen: usize,
    pub candidates: usize,
    pub containers: Vec<ContainerSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerSummary {
    pub element: String,
    pub name: String,
    pub search_url: String,
    pub button_attached: bool,
}
