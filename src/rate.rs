//! Rolling-window heartbeat rate estimation
//!
//! Heartbeats arrive irregularly. The estimator keeps the most recent
//! timestamps newest-first and reports the inverse of the mean gap between
//! them. When the link goes quiet for longer than that mean, the current time
//! is folded in as a synthetic newest sample so a dead link shows a falling
//! rate instead of the last healthy figure.

use std::collections::VecDeque;

/// Value returned while the rate cannot be computed.
pub const RATE_UNKNOWN: f64 = -1.0;

/// Default number of timestamps kept.
pub const DEFAULT_WINDOW: usize = 4;

/// Largest window an estimator will keep.
pub const MAX_WINDOW: usize = 64;

/// Bounded newest-first timestamp history with a smoothed rate.
#[derive(Debug, Clone)]
pub struct RateEstimator {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl RateEstimator {
    /// Create an estimator keeping `capacity` timestamps.
    ///
    /// A rate needs at least two samples, so capacities below 2 are raised to 2.
    /// Capacities above [`MAX_WINDOW`] are lowered to it.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(2, MAX_WINDOW);
        Self { samples: VecDeque::with_capacity(capacity + 1), capacity }
    }

    /// Record one event timestamp, evicting the oldest when full.
    pub fn record_event(&mut self, timestamp: f64) {
        self.samples.push_front(timestamp);
        if self.samples.len() > self.capacity {
            self.samples.pop_back();
        }
    }

    /// Smoothed event rate in Hz at time `now`.
    ///
    /// Returns [`RATE_UNKNOWN`] with fewer than two samples, or when the
    /// buffered gaps do not average to a positive finite value.
    pub fn estimate_rate_hz(&self, now: f64) -> f64 {
        let Some(&newest) = self.samples.front() else {
            return RATE_UNKNOWN;
        };
        if self.samples.len() < 2 {
            return RATE_UNKNOWN;
        }

        let mut avg = mean_gap(self.samples.iter().copied());
        if avg < now - newest {
            avg = mean_gap(std::iter::once(now).chain(self.samples.iter().copied()));
        }

        if avg.is_finite() && avg > 0.0 { 1.0 / avg } else { RATE_UNKNOWN }
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples have been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured window size.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Buffered samples, newest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

/// Mean of consecutive differences of a newest-first sequence.
fn mean_gap(samples: impl Iterator<Item = f64>) -> f64 {
    let mut samples = samples.peekable();
    let mut sum = 0.0;
    let mut gaps = 0usize;
    while let Some(current) = samples.next() {
        if let Some(&older) = samples.peek() {
            sum += current - older;
            gaps += 1;
        }
    }
    sum / gaps as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn unknown_with_fewer_than_two_samples() {
        let mut estimator = RateEstimator::default();
        assert_eq!(estimator.estimate_rate_hz(10.0), RATE_UNKNOWN);

        estimator.record_event(10.0);
        assert_eq!(estimator.estimate_rate_hz(10.0), RATE_UNKNOWN);
    }

    #[test]
    fn steady_one_hz_heartbeat() {
        let mut estimator = RateEstimator::default();
        for t in [1.0, 2.0, 3.0, 4.0] {
            estimator.record_event(t);
        }
        assert!(approx_eq(estimator.estimate_rate_hz(4.0), 1.0));
    }

    #[test]
    fn window_evicts_oldest() {
        let mut estimator = RateEstimator::new(4);
        for t in [0.0, 10.0, 10.5, 11.0, 11.5] {
            estimator.record_event(t);
        }
        assert_eq!(estimator.len(), 4);
        assert_eq!(estimator.samples().collect::<Vec<_>>(), vec![11.5, 11.0, 10.5, 10.0]);
        assert!(approx_eq(estimator.estimate_rate_hz(11.5), 2.0));
    }

    #[test]
    fn stale_link_widens_the_estimate() {
        let mut estimator = RateEstimator::default();
        for t in [1.0, 2.0, 3.0, 4.0] {
            estimator.record_event(t);
        }
        // Four seconds of silence: gaps become (8-4) + 1 + 1 + 1 over 4.
        let rate = estimator.estimate_rate_hz(8.0);
        assert!(approx_eq(rate, 4.0 / 7.0));
    }

    #[test]
    fn duplicate_timestamps_report_unknown() {
        let mut estimator = RateEstimator::default();
        estimator.record_event(5.0);
        estimator.record_event(5.0);
        assert_eq!(estimator.estimate_rate_hz(5.0), RATE_UNKNOWN);
    }

    #[test]
    fn backwards_clock_reports_unknown() {
        let mut estimator = RateEstimator::default();
        estimator.record_event(5.0);
        estimator.record_event(4.0);
        assert_eq!(estimator.estimate_rate_hz(4.0), RATE_UNKNOWN);
    }

    #[test]
    fn tiny_capacity_is_raised_to_two() {
        let mut estimator = RateEstimator::new(0);
        assert_eq!(estimator.capacity(), 2);
        estimator.record_event(1.0);
        estimator.record_event(1.5);
        assert!(approx_eq(estimator.estimate_rate_hz(1.5), 2.0));
    }

    #[test]
    fn oversized_capacity_is_capped() {
        let mut estimator = RateEstimator::new(usize::MAX);
        assert_eq!(estimator.capacity(), MAX_WINDOW);

        for t in 0..(MAX_WINDOW * 2) {
            estimator.record_event(t as f64);
        }
        assert_eq!(estimator.len(), MAX_WINDOW);
        assert!(approx_eq(estimator.estimate_rate_hz((MAX_WINDOW * 2 - 1) as f64), 1.0));
    }

    proptest! {
        #[test]
        fn rate_is_inverse_mean_gap_right_after_last_event(
            start in 0.0f64..1.0e6,
            gaps in prop::collection::vec(0.01f64..10.0, 1..4)
        ) {
            let mut estimator = RateEstimator::new(5);
            let mut t = start;
            estimator.record_event(t);
            for gap in &gaps {
                t += gap;
                estimator.record_event(t);
            }

            let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
            let rate = estimator.estimate_rate_hz(t);
            prop_assert!((rate - 1.0 / mean).abs() <= 1e-6 * (1.0 / mean).max(1.0));
        }

        #[test]
        fn guard_never_overstates_rate(
            start in 0.0f64..1.0e6,
            gaps in prop::collection::vec(0.01f64..10.0, 1..6),
            silence in 0.0f64..100.0
        ) {
            let mut estimator = RateEstimator::new(4);
            let mut t = start;
            estimator.record_event(t);
            for gap in &gaps {
                t += gap;
                estimator.record_event(t);
            }

            let naive = estimator.estimate_rate_hz(t);
            let guarded = estimator.estimate_rate_hz(t + silence);
            prop_assert!(guarded <= naive * (1.0 + 1e-9));
            prop_assert!(guarded > 0.0);
        }

        #[test]
        fn buffer_never_exceeds_capacity(
            capacity in 2usize..8,
            events in prop::collection::vec(0.0f64..1.0e6, 0..32)
        ) {
            let mut estimator = RateEstimator::new(capacity);
            for event in events {
                estimator.record_event(event);
                prop_assert!(estimator.len() <= capacity);
            }
        }
    }
}
