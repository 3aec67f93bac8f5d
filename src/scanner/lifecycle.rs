//! Rescan lifecycle
//!
//! [`ScanLoop`] owns every timer handle it schedules so that [`ScanLoop::teardown`]
//! can cancel them when the extension context goes away.

use super::timers::{ManualTimers, TimerHost, Trigger};
use super::watcher::{ChangeWatcher, MutationRecord, WatchOutcome};
use super::Scanner;
use crate::config::ScanConfig;
use crate::dom::PageDom;
use crate::models::{PointerEvent, ScanReport};
use crate::overlay::ButtonController;
use std::time::Duration;

/// Log line for the one-off rescan after `delay`
pub fn delayed_rescan_message(delay: Duration) -> String {
    format!("Reprocessing images after {} seconds...", delay.as_secs_f64())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    TornDown,
}

pub struct ScanLoop<P: PageDom, T: TimerHost> {
    scanner: Scanner,
    buttons: ButtonController<P>,
    watcher: ChangeWatcher,
    timers: T,
    delayed_rescan: Duration,
    periodic_rescan: Duration,
    delayed: Option<T::Handle>,
    periodic: Option<T::Handle>,
    pending: Option<T::Handle>,
    state: LoopState,
    passes: usize,
}

impl<P: PageDom, T: TimerHost> ScanLoop<P, T> {
    pub fn new(config: &ScanConfig, timers: T) -> Self {
        Self {
            scanner: Scanner::new(config),
            buttons: ButtonController::new(config),
            watcher: ChangeWatcher::new(config.debounce()),
            timers,
            delayed_rescan: config.delayed_rescan(),
            periodic_rescan: config.periodic_rescan(),
            delayed: None,
            periodic: None,
            pending: None,
            state: LoopState::Idle,
            passes: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Completed discovery passes
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn delayed_rescan(&self) -> Duration {
        self.delayed_rescan
    }

    pub fn buttons(&self) -> &ButtonController<P> {
        &self.buttons
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Initial scan once the document is interactive, then arm the delayed
    /// and periodic rescans. Calling it again is a no-op.
    pub fn start(&mut self, page: &mut P) -> Option<ScanReport<P::Node>> {
        if self.state != LoopState::Idle {
            return None;
        }
        self.state = LoopState::Running;

        let report = self.run_pass(page);
        self.delayed = Some(self.timers.schedule_once(self.delayed_rescan, Trigger::Delayed));
        self.periodic = Some(self.timers.schedule_repeating(self.periodic_rescan, Trigger::Periodic));

        tracing::info!(
            "Scan loop started: {} containers, rescans after {:?} and every {:?}",
            report.containers.len(),
            self.delayed_rescan,
            self.periodic_rescan
        );

        Some(report)
    }

    /// Feed one observer callback's records. Schedules at most one pending rescan.
    pub fn on_mutations(&mut self, records: &[MutationRecord]) -> WatchOutcome {
        if self.state != LoopState::Running {
            return WatchOutcome::Ignored;
        }

        let outcome = self.watcher.observe(records);
        if let WatchOutcome::Schedule(delay) = outcome {
            self.pending = Some(self.timers.schedule_once(delay, Trigger::Mutation));
        }
        outcome
    }

    /// A scheduled timer fired
    pub fn fire(&mut self, page: &mut P, trigger: Trigger) -> Option<ScanReport<P::Node>> {
        if self.state != LoopState::Running {
            return None;
        }

        match trigger {
            Trigger::Delayed => {
                self.delayed = None;
                tracing::info!("{}", delayed_rescan_message(self.delayed_rescan));
            }
            Trigger::Periodic => {
                tracing::debug!("Recurring reprocessing");
            }
            Trigger::Mutation => {
                self.pending = None;
                if !self.watcher.fire() {
                    return None;
                }
                let refreshed = self.buttons.refresh_processed(page);
                tracing::debug!("DOM changed, refreshed {} containers", refreshed);
            }
        }

        Some(self.run_pass(page))
    }

    pub fn on_pointer(&mut self, page: &mut P, container: &P::Node, event: PointerEvent) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.buttons.on_pointer(page, container, event)
    }

    /// Cancel every timer, drop the pending rescan and release all buttons
    pub fn teardown(&mut self, page: &mut P) {
        if self.state == LoopState::TornDown {
            return;
        }

        for handle in [self.delayed.take(), self.periodic.take(), self.pending.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(handle);
        }
        self.watcher.cancel();
        self.buttons.release(page);
        self.state = LoopState::TornDown;

        tracing::info!("Scan loop torn down after {} passes", self.passes);
    }

    fn run_pass(&mut self, page: &mut P) -> ScanReport<P::Node> {
        self.passes += 1;
        self.scanner.scan(page, &mut self.buttons)
    }
}

impl<P: PageDom> ScanLoop<P, ManualTimers> {
    /// Advance the virtual clock and deliver every trigger that came due.
    /// Returns the number of passes that ran.
    pub fn advance(&mut self, page: &mut P, by: Duration) -> usize {
        let due = self.timers.advance(by);
        due.into_iter()
            .filter_map(|trigger| self.fire(page, trigger))
            .count()
    }
}
