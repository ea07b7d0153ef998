use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default sliding window for rate computation.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(1);

/// Sliding-window sample-rate estimator.
///
/// Records one timestamp per accepted frame and reports the count of
/// samples inside the window divided by the window length. This is a
/// literal filter-and-count, not an EWMA: the pruning pass is O(expired)
/// per query, which is fine at the tens-of-Hz rates a headset produces.
#[derive(Debug)]
pub struct RateTracker {
    samples: VecDeque<Instant>,
    window: Duration,
}

impl RateTracker {
    /// Create a tracker with an explicit window.
    pub fn new(window: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            window,
        }
    }

    /// Record one sample at `at`.
    ///
    /// Samples are assumed monotonically non-decreasing; the receive loop
    /// is the only writer and stamps frames as they arrive.
    pub fn record_sample(&mut self, at: Instant) {
        self.samples.push_back(at);
    }

    /// Samples-per-second over the window ending at `now`.
    ///
    /// Prunes samples older than `now - window` first; returns 0.0 when
    /// none remain. Samples exactly at the window edge are retained.
    pub fn rate_hz(&mut self, now: Instant) -> f64 {
        self.prune(now);
        self.samples.len() as f64 / self.window.as_secs_f64()
    }

    /// Number of samples currently inside the window ending at `now`.
    pub fn sample_count(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.samples.len()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.samples.front() {
            if now.duration_since(oldest) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, secs: f64) -> Instant {
        base + Duration::from_secs_f64(secs)
    }

    #[test]
    fn five_samples_in_window_is_five_hz() {
        let base = Instant::now();
        let mut tracker = RateTracker::default();

        for i in 0..5 {
            tracker.record_sample(at(base, 0.2 * i as f64));
        }

        assert_eq!(tracker.rate_hz(at(base, 0.9)), 5.0);
    }

    #[test]
    fn stale_samples_decay_to_zero() {
        let base = Instant::now();
        let mut tracker = RateTracker::default();

        for i in 0..5 {
            tracker.record_sample(at(base, 0.2 * i as f64));
        }

        assert_eq!(tracker.rate_hz(at(base, 0.9)), 5.0);
        assert_eq!(tracker.rate_hz(at(base, 1.9)), 0.0);
    }

    #[test]
    fn empty_tracker_reports_zero() {
        let mut tracker = RateTracker::default();
        assert_eq!(tracker.rate_hz(Instant::now()), 0.0);
    }

    #[test]
    fn sample_at_window_edge_is_retained() {
        let base = Instant::now();
        let mut tracker = RateTracker::default();

        tracker.record_sample(base);
        assert_eq!(tracker.sample_count(at(base, 1.0)), 1);
        assert_eq!(tracker.sample_count(at(base, 1.001)), 0);
    }

    #[test]
    fn partial_expiry_keeps_recent_samples() {
        let base = Instant::now();
        let mut tracker = RateTracker::default();

        for i in 0..5 {
            tracker.record_sample(at(base, 0.2 * i as f64));
        }

        // At t=1.3 the samples at 0.0 and 0.2 have aged out.
        assert_eq!(tracker.sample_count(at(base, 1.3)), 3);
        assert_eq!(tracker.rate_hz(at(base, 1.3)), 3.0);
    }

    #[test]
    fn custom_window_scales_rate() {
        let base = Instant::now();
        let mut tracker = RateTracker::new(Duration::from_secs(2));

        for i in 0..4 {
            tracker.record_sample(at(base, 0.5 * i as f64));
        }

        assert_eq!(tracker.rate_hz(at(base, 1.6)), 2.0);
    }
}
