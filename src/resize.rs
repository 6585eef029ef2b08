//! Container resize observation.
//!
//! Hosts with a native resize notification push sizes in as they change
//! ([`ResizeSource::Observer`]). Hosts without one poll: a [`PollSchedule`]
//! says when the interval has elapsed and a [`SizeWatcher`] reports whether
//! the size read at that point differs from the last one seen.

use core::time::Duration;

use crate::cover::ContainerSize;

/// Default interval between container size polls.
pub const DEFAULT_RESIZE_INTERVAL: Duration = Duration::from_millis(250);

/// Where container size changes come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResizeSource {
    /// The host reports size changes as they happen.
    Observer,
    /// The host is polled at the given interval.
    Poll(Duration),
}

impl ResizeSource {
    /// Prefer native observation; fall back to polling at `interval`.
    pub fn detect(supports_observer: bool, interval: Duration) -> Self {
        if supports_observer {
            Self::Observer
        } else {
            Self::Poll(interval)
        }
    }

    pub fn is_polling(&self) -> bool {
        matches!(self, Self::Poll(_))
    }
}

/// Tracks when the next poll is due.
///
/// Time is supplied by the caller as a monotonic duration since some fixed
/// origin, so the schedule works without a clock of its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PollSchedule {
    interval: Duration,
    next_due: Option<Duration>,
}

impl PollSchedule {
    /// First call to [`due`](Self::due) always fires.
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a poll is due at `now`. Firing schedules the next poll one
    /// interval after `now`, so late ticks do not cause bursts.
    pub fn due(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(next) if now < next => false,
            _ => {
                self.next_due = Some(now.saturating_add(self.interval));
                true
            }
        }
    }

    /// Change the interval, keeping the current deadline.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }
}

/// Change detector for container sizes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SizeWatcher {
    last: Option<ContainerSize>,
}

impl SizeWatcher {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Last size recorded or observed.
    pub fn last(&self) -> Option<ContainerSize> {
        self.last
    }

    /// Record `size` and report whether it differs from the previous one.
    ///
    /// The first observation always counts as a change.
    /// NaN matches NaN, so a host stuck reporting an unreadable size does
    /// not count as changing on every poll.
    pub fn observe(&mut self, size: ContainerSize) -> bool {
        let changed = !self.last.is_some_and(|last| same_size(last, size));
        self.last = Some(size);
        changed
    }

    /// Record `size` without reporting.
    pub fn record(&mut self, size: ContainerSize) {
        self.last = Some(size);
    }

    /// Forget the last size; the next observation counts as a change.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn same_size(a: ContainerSize, b: ContainerSize) -> bool {
    let same = |x: f64, y: f64| x == y || (x.is_nan() && y.is_nan());
    same(a.width, b.width) && same(a.height, b.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn detect_prefers_observer() {
        assert_eq!(ResizeSource::detect(true, ms(250)), ResizeSource::Observer);
        assert_eq!(ResizeSource::detect(false, ms(100)), ResizeSource::Poll(ms(100)));
        assert!(ResizeSource::Poll(ms(1)).is_polling());
        assert!(!ResizeSource::Observer.is_polling());
    }

    #[test]
    fn schedule_fires_immediately_then_per_interval() {
        let mut s = PollSchedule::new(DEFAULT_RESIZE_INTERVAL);
        assert!(s.due(ms(0)));
        assert!(!s.due(ms(100)));
        assert!(!s.due(ms(249)));
        assert!(s.due(ms(250)));
        assert!(!s.due(ms(400)));
        assert!(s.due(ms(500)));
    }

    #[test]
    fn late_tick_reschedules_from_now() {
        let mut s = PollSchedule::new(ms(250));
        assert!(s.due(ms(0)));
        assert!(s.due(ms(1000)));
        assert!(!s.due(ms(1100)));
        assert!(s.due(ms(1250)));
    }

    #[test]
    fn interval_change_applies_after_current_deadline() {
        let mut s = PollSchedule::new(ms(250));
        assert!(s.due(ms(0)));
        s.set_interval(ms(50));
        assert_eq!(s.interval(), ms(50));
        assert!(!s.due(ms(100)));
        assert!(s.due(ms(250)));
        assert!(s.due(ms(300)));
    }

    #[test]
    fn watcher_reports_changes_only() {
        let mut w = SizeWatcher::new();
        let a = ContainerSize::new(400.0, 300.0);
        let b = ContainerSize::new(401.0, 300.0);
        assert!(w.observe(a));
        assert!(!w.observe(a));
        assert!(w.observe(b));
        assert_eq!(w.last(), Some(b));
        w.reset();
        assert!(w.observe(b));
    }

    #[test]
    fn nan_size_is_not_a_change_every_time() {
        let mut w = SizeWatcher::new();
        let unreadable = ContainerSize::new(f64::NAN, 300.0);
        assert!(w.observe(unreadable));
        assert!(!w.observe(unreadable));
        assert!(w.observe(ContainerSize::new(400.0, 300.0)));
        assert!(w.observe(unreadable));
    }

    #[test]
    fn record_suppresses_next_change() {
        let mut w = SizeWatcher::new();
        let a = ContainerSize::new(10.0, 10.0);
        w.record(a);
        assert!(!w.observe(a));
    }
}
