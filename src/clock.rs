//! Time sources for rate estimation and broadcast ticks

use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in seconds.
///
/// Must be on the same timeline as the timestamps the device link attaches to
/// its updates, otherwise the freshness guard of the rate estimator misfires.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> f64;
}

/// Wall-clock seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }
}

/// Manually advanced clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    /// Create a clock reading `start`
    pub fn new(start: f64) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Set the current time.
    pub fn set(&self, now: f64) {
        *self.now.lock() = now;
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        *self.now.lock() += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(100.0);
        clock.advance(0.5);
        assert_eq!(clock.now(), 100.5);
        clock.set(3.0);
        assert_eq!(clock.now(), 3.0);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now() > 1_577_836_800.0);
    }
}
