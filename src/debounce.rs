//! Trigger debouncing module.
//!
//! Terminals repeat a held key many times per second. This module keeps the timestamp of the last
//! accepted trigger so that a burst of presses only fires once per interval.

use std::time::{Duration, Instant};

/// Default minimum delay between two accepted dungeon resets.
pub const DEFAULT_RESET_INTERVAL_MS: u64 = 500;

/// Rate limiter for a single trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debounce {
    /// Minimum delay between two accepted triggers.
    interval: Duration,
    /// Timestamp of the last accepted trigger, `None` until the first one.
    last_accepted: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_RESET_INTERVAL_MS))
    }
}

impl Debounce {
    /// Creates a debouncer that accepts at most one trigger per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Minimum delay between two accepted triggers.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Decides whether a trigger happening at `now` goes through.
    ///
    /// The first trigger is always accepted. Later ones are accepted once `interval` has passed
    /// since the last accepted trigger; rejected triggers do not extend the wait.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        let ready = match self.last_accepted {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if ready {
            self.last_accepted = Some(now);
        }

        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_trigger_is_accepted() {
        let mut debounce = Debounce::default();

        assert!(debounce.try_accept(Instant::now()));
    }

    #[test]
    fn test_burst_fires_once() {
        let mut debounce = Debounce::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(debounce.try_accept(start));
        assert!(!debounce.try_accept(start + Duration::from_millis(10)));
        assert!(!debounce.try_accept(start + Duration::from_millis(499)));
        assert!(debounce.try_accept(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_rejected_triggers_do_not_extend_the_wait() {
        let mut debounce = Debounce::new(Duration::from_millis(100));
        let start = Instant::now();

        assert!(debounce.try_accept(start));
        for offset in [20, 40, 60, 80] {
            assert!(!debounce.try_accept(start + Duration::from_millis(offset)));
        }
        assert!(debounce.try_accept(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_interval_accepts_everything() {
        let mut debounce = Debounce::new(Duration::ZERO);
        let start = Instant::now();

        assert!(debounce.try_accept(start));
        assert!(debounce.try_accept(start));
        assert_eq!(debounce.interval(), Duration::ZERO);
    }
}
