//! DOM change watching with a single-slot debounce

use std::time::Duration;

/// Host-independent view of an added node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddedNode {
    pub is_element: bool,
    pub is_image: bool,
    pub contains_image: bool,
}

impl AddedNode {
    pub fn image() -> Self {
        Self {
            is_element: true,
            is_image: true,
            contains_image: false,
        }
    }

    pub fn element(contains_image: bool) -> Self {
        Self {
            is_element: true,
            is_image: false,
            contains_image,
        }
    }

    pub fn text() -> Self {
        Self::default()
    }
}

/// One observed mutation, reduced to what the watcher needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    ChildList { added: Vec<AddedNode> },
    Attribute { name: String, target_is_image: bool },
}

impl MutationRecord {
    /// Brings in an image or swaps an image source
    pub fn is_relevant(&self) -> bool {
        match self {
            MutationRecord::ChildList { added } => added
                .iter()
                .any(|node| node.is_element && (node.is_image || node.contains_image)),
            MutationRecord::Attribute { name, target_is_image } => *target_is_image && name == "src",
        }
    }
}

/// Pending flag plus at most one scheduled callback
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: bool,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: false }
    }

    /// Returns the delay to schedule with, or `None` when a callback is
    /// already pending and this request folds into it.
    pub fn request(&mut self) -> Option<Duration> {
        if self.pending {
            return None;
        }
        self.pending = true;
        Some(self.delay)
    }

    /// Called when the scheduled callback runs. Returns whether it was pending.
    pub fn fire(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Nothing image-related changed
    Ignored,
    /// A rescan must be scheduled after the given delay
    Schedule(Duration),
    /// A rescan is already pending
    Coalesced,
}

#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    debouncer: Debouncer,
}

impl ChangeWatcher {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Inspect one observer callback's batch of records
    pub fn observe(&mut self, records: &[MutationRecord]) -> WatchOutcome {
        if !records.iter().any(MutationRecord::is_relevant) {
            return WatchOutcome::Ignored;
        }

        match self.debouncer.request() {
            Some(delay) => WatchOutcome::Schedule(delay),
            None => WatchOutcome::Coalesced,
        }
    }

    /// The scheduled rescan is running
    pub fn fire(&mut self) -> bool {
        self.debouncer.fire()
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
