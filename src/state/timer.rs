//! Per-turn countdown.
//!
//! The countdown does not own a clock. It asks a [`Scheduler`] for a repeating
//! firing and is advanced by the host calling [`Timer::on_interval`] with the
//! handle that fired. Firings for any other handle are stale (a cancelled or
//! superseded countdown) and are ignored, so at most one countdown is ever live.
//!
//! ```text
//! start(15)  ──▶ Tick(15)
//! interval   ──▶ Tick(14) ... Tick(1)
//! interval   ──▶ Expired(0)   (scheduler handle cancelled)
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

/// Identifies one repeating schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Clock capability used by the countdown.
pub trait Scheduler {
    /// Start a repeating firing every `interval`.
    fn schedule_repeating(&mut self, interval: Duration) -> ScheduleHandle;

    /// Stop a firing. Unknown handles are ignored.
    fn cancel(&mut self, handle: ScheduleHandle);
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    interval: Duration,
    next_due: Duration,
}

/// Virtual clock driven by explicit `advance` calls.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    schedules: BTreeMap<ScheduleHandle, Schedule>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of live schedules.
    pub fn active_count(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_active(&self, handle: ScheduleHandle) -> bool {
        self.schedules.contains_key(&handle)
    }

    /// Move the clock forward, returning every firing that fell due, in order.
    ///
    /// Firings are computed up front; a handle cancelled while the caller is
    /// processing the list still appears in it and must be treated as stale.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ScheduleHandle> {
        let target = self.now + elapsed;
        let mut fired = Vec::new();

        loop {
            let next = self
                .schedules
                .iter()
                .filter(|(_, s)| s.next_due <= target)
                .min_by_key(|(handle, s)| (s.next_due, **handle))
                .map(|(handle, s)| (*handle, s.next_due));

            let Some((handle, due)) = next else { break };
            if let Some(schedule) = self.schedules.get_mut(&handle) {
                schedule.next_due += schedule.interval;
            }
            self.now = due;
            fired.push(handle);
        }

        self.now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> ScheduleHandle {
        let interval = interval.max(Duration::from_millis(1));
        self.next_id += 1;
        let handle = ScheduleHandle(self.next_id);
        self.schedules.insert(
            handle,
            Schedule {
                interval,
                next_due: self.now + interval,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.schedules.remove(&handle);
    }
}

/// Countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimerState {
    pub time_left: u32,
    pub running: bool,
}

/// Countdown reading for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerTick {
    pub time_left: u32,
    /// At or below the warning threshold; presentation only
    pub is_warning: bool,
}

/// Result of a live firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick(TimerTick),
    /// Final tick at zero. Produced once per countdown.
    Expired(TimerTick),
}

impl TimerSignal {
    pub fn tick(&self) -> TimerTick {
        match self {
            Self::Tick(tick) | Self::Expired(tick) => *tick,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }
}

/// Single countdown. Starting again cancels the previous one.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    state: TimerState,
    warning_threshold: u32,
    handle: Option<ScheduleHandle>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a countdown from `limit_secs`, returning the immediate first tick.
    pub fn start<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        limit_secs: u32,
        warning_threshold: u32,
        interval: Duration,
    ) -> TimerTick {
        self.cancel(scheduler);
        self.state = TimerState {
            time_left: limit_secs,
            running: true,
        };
        self.warning_threshold = warning_threshold;
        self.handle = Some(scheduler.schedule_repeating(interval));
        self.reading()
    }

    /// Handle a scheduler firing. Returns `None` for stale handles.
    pub fn on_interval<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        handle: ScheduleHandle,
    ) -> Option<TimerSignal> {
        if !self.state.running || self.handle != Some(handle) {
            return None;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        let tick = self.reading();
        if self.state.time_left == 0 {
            self.cancel(scheduler);
            Some(TimerSignal::Expired(tick))
        } else {
            Some(TimerSignal::Tick(tick))
        }
    }

    /// Stop the countdown. Idempotent.
    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
        self.state.running = false;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn time_left(&self) -> u32 {
        self.state.time_left
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn handle(&self) -> Option<ScheduleHandle> {
        self.handle
    }

    fn reading(&self) -> TimerTick {
        TimerTick {
            time_left: self.state.time_left,
            is_warning: self.state.time_left <= self.warning_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_full_countdown() {
        let mut clock = ManualScheduler::new();
        let mut timer = Timer::new();

        let mut ticks = vec![timer.start(&mut clock, 15, 5, SECOND)];
        let mut expiries = 0;

        // Run well past the limit; stale firings must be ignored
        for handle in clock.advance(Duration::from_secs(30)) {
            if let Some(signal) = timer.on_interval(&mut clock, handle) {
                ticks.push(signal.tick());
                if signal.is_expired() {
                    expiries += 1;
                }
            }
        }

        assert_eq!(ticks.len(), 16);
        assert_eq!(expiries, 1);
        let times: Vec<u32> = ticks.iter().map(|t| t.time_left).collect();
        assert_eq!(times, (0..=15).rev().collect::<Vec<_>>());
        assert!(!timer.is_running());
        assert_eq!(clock.active_count(), 0);
    }

    #[test]
    fn test_warning_threshold() {
        let mut clock = ManualScheduler::new();
        let mut timer = Timer::new();

        let first = timer.start(&mut clock, 7, 5, SECOND);
        assert!(!first.is_warning);

        let handle = clock.advance(SECOND)[0];
        let tick = timer.on_interval(&mut clock, handle).unwrap().tick();
        assert_eq!(
            tick,
            TimerTick {
                time_left: 6,
                is_warning: false,
            }
        );

        let handle = clock.advance(SECOND)[0];
        let tick = timer.on_interval(&mut clock, handle).unwrap().tick();
        assert_eq!(
            tick,
            TimerTick {
                time_left: 5,
                is_warning: true,
            }
        );
    }

    #[test]
    fn test_restart_cancels_previous() {
        let mut clock = ManualScheduler::new();
        let mut timer = Timer::new();

        timer.start(&mut clock, 15, 5, SECOND);
        let old = timer.handle().unwrap();
        clock.advance(Duration::from_millis(500));

        timer.start(&mut clock, 15, 5, SECOND);
        assert!(!clock.is_active(old));
        assert_eq!(clock.active_count(), 1);

        // A late firing of the old handle changes nothing
        assert_eq!(timer.on_interval(&mut clock, old), None);
        assert_eq!(timer.time_left(), 15);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut clock = ManualScheduler::new();
        let mut timer = Timer::new();

        timer.start(&mut clock, 3, 1, SECOND);
        let handle = timer.handle().unwrap();
        timer.cancel(&mut clock);
        timer.cancel(&mut clock);

        assert!(!timer.is_running());
        assert!(clock.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(timer.on_interval(&mut clock, handle), None);
    }

    #[test]
    fn test_manual_scheduler_ordering() {
        let mut clock = ManualScheduler::new();
        let a = clock.schedule_repeating(Duration::from_millis(300));
        let b = clock.schedule_repeating(Duration::from_millis(500));

        let fired = clock.advance(Duration::from_millis(1000));
        // a@300, b@500, a@600, a@900, b@1000
        assert_eq!(fired, vec![a, b, a, a, b]);
        assert_eq!(clock.now(), Duration::from_millis(1000));
    }
}
