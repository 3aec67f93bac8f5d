//! Timer abstraction for the rescan lifecycle

use std::time::Duration;

/// What a scheduled callback should do when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// One-off rescan shortly after start, for late-loading images
    Delayed,
    /// Recurring rescan for the lifetime of the page
    Periodic,
    /// Debounced rescan after DOM mutations
    Mutation,
}

/// Host timer facility. Callbacks are delivered by the host calling
/// [`ScanLoop::fire`](super::ScanLoop::fire) with the scheduled trigger.
pub trait TimerHost {
    type Handle;

    fn schedule_once(&mut self, delay: Duration, trigger: Trigger) -> Self::Handle;

    fn schedule_repeating(&mut self, period: Duration, trigger: Trigger) -> Self::Handle;

    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct ScheduledTimer {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    trigger: Trigger,
}

/// Virtual clock. Time only moves through [`ManualTimers::advance`].
#[derive(Debug, Clone, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    scheduled: Vec<ScheduledTimer>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Timers still armed
    pub fn active(&self) -> usize {
        self.scheduled.len()
    }

    /// Move the clock forward and return every trigger that came due, in
    /// firing order. Repeating timers fire once per elapsed period.
    pub fn advance(&mut self, by: Duration) -> Vec<Trigger> {
        let target = self.now + by;
        let mut fired = Vec::new();

        loop {
            let next = self
                .scheduled
                .iter()
                .enumerate()
                .filter(|(_, timer)| timer.due <= target)
                .min_by_key(|(_, timer)| (timer.due, timer.id.0))
                .map(|(index, _)| index);

            let Some(index) = next else {
                break;
            };

            let timer = &mut self.scheduled[index];
            self.now = timer.due;
            fired.push(timer.trigger);

            match timer.period {
                Some(period) => timer.due += period,
                None => {
                    self.scheduled.remove(index);
                }
            }
        }

        self.now = target;
        fired
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, trigger: Trigger) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.scheduled.push(ScheduledTimer {
            id,
            due: self.now + delay,
            period,
            trigger,
        });
        id
    }
}

impl TimerHost for ManualTimers {
    type Handle = TimerId;

    fn schedule_once(&mut self, delay: Duration, trigger: Trigger) -> TimerId {
        self.push(delay, None, trigger)
    }

    fn schedule_repeating(&mut self, period: Duration, trigger: Trigger) -> TimerId {
        self.push(period, Some(period), trigger)
    }

    fn cancel(&mut self, handle: TimerId) {
        self.scheduled.retain(|timer| timer.id != handle);
    }
}
