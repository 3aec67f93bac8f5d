//! Page scanning: one discovery pass, DOM change watching and the rescan lifecycle

pub mod lifecycle;
pub mod timers;
pub mod watcher;

pub use lifecycle::{delayed_rescan_message, LoopState, ScanLoop};
pub use timers::{ManualTimers, TimerHost, TimerId, Trigger};
pub use watcher::{AddedNode, ChangeWatcher, Debouncer, MutationRecord, WatchOutcome};

use crate::config::ScanConfig;
use crate::detector::{extract_container_name, ContainerResolver, ImageClassifier};
use crate::dom::PageDom;
use crate::models::{ProcessedContainer, ScanReport};
use crate::overlay::ButtonController;
use std::collections::HashSet;

/// Classify, resolve and deduplicate, then hand each container to the buttons
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    classifier: ImageClassifier,
    resolver: ContainerResolver,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            classifier: ImageClassifier::new(config),
            resolver: ContainerResolver::new(config),
        }
    }

    pub fn classifier(&self) -> &ImageClassifier {
        &self.classifier
    }

    pub fn resolver(&self) -> &ContainerResolver {
        &self.resolver
    }

    /// Containers for every candidate image, each once, in discovery order
    pub fn discover<P: PageDom>(&self, page: &P) -> (usize, usize, Vec<P::Node>) {
        let images = page.images();
        let mut candidates = 0;
        let mut containers: Vec<P::Node> = Vec::new();
        let mut seen: HashSet<P::Key> = HashSet::new();

        for image in &images {
            if !self.classifier.is_candidate(page, image) {
                continue;
            }
            candidates += 1;

            if let Some(container) = self.resolver.resolve(page, image) {
                if seen.insert(page.key(&container)) {
                    containers.push(container);
                }
            }
        }

        (images.len(), candidates, containers)
    }

    /// One full pass
    pub fn scan<P: PageDom>(&self, page: &mut P, buttons: &mut ButtonController<P>) -> ScanReport<P::Node> {
        buttons.prune_detached(page);
        let (images_seen, candidates, containers) = self.discover(page);

        let mut report = ScanReport {
            images_seen,
            candidates,
            containers: Vec::with_capacity(containers.len()),
        };

        for container in containers {
            let name = extract_container_name(page, &container);
            let button_attached = buttons.process(page, &container, &name);
            report.containers.push(ProcessedContainer {
                node: container,
                name,
                button_attached,
            });
        }

        tracing::debug!(
            "Scan pass: {} images, {} candidates, {} containers",
            report.images_seen,
            report.candidates,
            report.containers.len()
        );

        report
    }
}
