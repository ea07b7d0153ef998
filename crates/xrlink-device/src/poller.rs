use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Result, SdkError};
use crate::orientation::{EulerAngles, Quaternion, MIN_POSE_LEN};
use crate::sdk::HeadsetSdk;

/// Default pose polling frequency.
pub const DEFAULT_TARGET_HZ: f64 = 60.0;

/// Configuration for the fixed-rate pose loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Target polling frequency in Hz. Default: 60.
    pub target_hz: f64,
    /// Stop after this many valid samples. `None` = run until interrupted.
    pub max_samples: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            target_hz: DEFAULT_TARGET_HZ,
            max_samples: None,
        }
    }
}

impl PollConfig {
    /// Target cycle interval derived from the configured frequency.
    ///
    /// A non-positive frequency falls back to the default rather than
    /// producing a zero or negative interval.
    pub fn interval(&self) -> Duration {
        let hz = if self.target_hz > 0.0 {
            self.target_hz
        } else {
            DEFAULT_TARGET_HZ
        };
        Duration::from_secs_f64(1.0 / hz)
    }
}

/// One valid poll result.
#[derive(Debug, Clone, Copy)]
pub struct PoseSample {
    /// Orientation quaternion from the pose vector.
    pub quaternion: Quaternion,
    /// Orientation converted to degrees.
    pub euler: EulerAngles,
    /// Device timestamp in nanoseconds.
    pub timestamp_ns: u64,
}

/// Fixed-rate pose polling loop over a [`HeadsetSdk`].
///
/// Independent of the stream receiver — no shared state. Each cycle polls
/// the device, converts the quaternion, delivers the sample, and sleeps
/// out the remainder of the target interval. Pacing is best-effort: a
/// slow cycle is not compensated for in later cycles.
pub struct PosePoller<S> {
    sdk: S,
    config: PollConfig,
}

impl<S: HeadsetSdk> PosePoller<S> {
    /// Create a poller over an already-initialized SDK adapter.
    pub fn new(sdk: S, config: PollConfig) -> Self {
        Self { sdk, config }
    }

    /// Run the loop until `running` clears or the sample budget is spent.
    ///
    /// Starts with a warm-up phase: while the device timestamp is zero the
    /// poller sleeps out the interval and retries, without bound and
    /// without backoff. Returns the number of valid samples delivered.
    pub fn run<F>(&mut self, running: &AtomicBool, mut on_sample: F) -> Result<u64>
    where
        F: FnMut(&PoseSample),
    {
        let interval = self.config.interval();
        info!(
            target_hz = self.config.target_hz,
            interval_ms = interval.as_secs_f64() * 1e3,
            "starting pose polling loop"
        );

        if !self.wait_for_valid_data(running, interval)? {
            return Ok(0);
        }
        info!("valid pose data received, starting output");

        let mut collected = 0u64;
        while running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();

            let sample = self.poll_once()?;
            on_sample(&sample);
            collected += 1;

            if let Some(budget) = self.config.max_samples {
                if collected >= budget {
                    break;
                }
            }

            sleep_remainder(interval, cycle_start.elapsed());
        }

        info!(samples = collected, "pose polling loop finished");
        Ok(collected)
    }

    /// Warm-up: poll until the device reports a nonzero timestamp.
    ///
    /// Returns `false` if interrupted before any valid data arrived.
    fn wait_for_valid_data(&mut self, running: &AtomicBool, interval: Duration) -> Result<bool> {
        debug!("waiting for valid pose data");
        while running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();

            let _pose = self.sdk.headset_pose()?;
            if self.sdk.timestamp_ns()? != 0 {
                return Ok(true);
            }

            sleep_remainder(interval, cycle_start.elapsed());
        }
        Ok(false)
    }

    /// One valid-phase poll: pose query, quaternion extraction, conversion.
    fn poll_once(&mut self) -> Result<PoseSample> {
        let pose = self.sdk.headset_pose()?;
        let timestamp_ns = self.sdk.timestamp_ns()?;

        let quaternion =
            Quaternion::from_pose_vector(&pose).ok_or(SdkError::MalformedPose {
                len: pose.len(),
                min: MIN_POSE_LEN,
            })?;

        Ok(PoseSample {
            quaternion,
            euler: quaternion.to_euler(),
            timestamp_ns,
        })
    }

    /// Consume the poller and return the SDK adapter for shutdown.
    pub fn into_inner(self) -> S {
        self.sdk
    }
}

fn sleep_remainder(interval: Duration, elapsed: Duration) {
    if let Some(remaining) = interval.checked_sub(elapsed) {
        std::thread::sleep(remaining);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::*;

    /// Scripted SDK: fixed pose, timestamp sequence consumed per query.
    struct ScriptedSdk {
        pose: Vec<f64>,
        timestamps: Vec<u64>,
        next: usize,
    }

    impl ScriptedSdk {
        fn new(pose: Vec<f64>, timestamps: Vec<u64>) -> Self {
            Self {
                pose,
                timestamps,
                next: 0,
            }
        }
    }

    impl HeadsetSdk for ScriptedSdk {
        fn init(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn headset_pose(&mut self) -> Result<Vec<f64>> {
            Ok(self.pose.clone())
        }

        fn timestamp_ns(&mut self) -> Result<u64> {
            let ts = self
                .timestamps
                .get(self.next)
                .copied()
                .unwrap_or_else(|| *self.timestamps.last().unwrap_or(&0));
            self.next += 1;
            Ok(ts)
        }
    }

    fn fast_config(max_samples: Option<u64>) -> PollConfig {
        PollConfig {
            target_hz: 10_000.0,
            max_samples,
        }
    }

    #[test]
    fn warm_up_retries_through_zero_timestamps() {
        let sdk = ScriptedSdk::new(
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            vec![0, 0, 0, 1_000],
        );
        let mut poller = PosePoller::new(sdk, fast_config(Some(1)));

        let running = AtomicBool::new(true);
        let mut samples = Vec::new();
        let collected = poller.run(&running, |s| samples.push(*s)).unwrap();

        assert_eq!(collected, 1);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].quaternion, Quaternion::identity());
    }

    #[test]
    fn sample_budget_bounds_the_run() {
        let sdk = ScriptedSdk::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0], vec![42]);
        let mut poller = PosePoller::new(sdk, fast_config(Some(5)));

        let running = AtomicBool::new(true);
        let collected = poller.run(&running, |_| {}).unwrap();

        assert_eq!(collected, 5);
    }

    #[test]
    fn cleared_flag_stops_before_any_sample() {
        let sdk = ScriptedSdk::new(vec![0.0; 7], vec![0]);
        let mut poller = PosePoller::new(sdk, fast_config(None));

        let running = AtomicBool::new(false);
        let collected = poller.run(&running, |_| {}).unwrap();

        assert_eq!(collected, 0);
    }

    #[test]
    fn short_pose_vector_is_an_error() {
        let sdk = ScriptedSdk::new(vec![0.0; 4], vec![7]);
        let mut poller = PosePoller::new(sdk, fast_config(Some(1)));

        let running = AtomicBool::new(true);
        let err = poller.run(&running, |_| {}).unwrap_err();
        assert!(matches!(err, SdkError::MalformedPose { len: 4, min: 7 }));
    }

    #[test]
    fn sample_carries_device_timestamp_and_euler() {
        let sdk = ScriptedSdk::new(
            // 90° yaw quaternion at indices 3..=6 (qx, qy, qz, qw).
            vec![
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                std::f64::consts::FRAC_1_SQRT_2,
                std::f64::consts::FRAC_1_SQRT_2,
            ],
            vec![9_000],
        );
        let mut poller = PosePoller::new(sdk, fast_config(Some(1)));

        let running = AtomicBool::new(true);
        let mut samples = Vec::new();
        poller.run(&running, |s| samples.push(*s)).unwrap();

        assert_eq!(samples[0].timestamp_ns, 9_000);
        assert!((samples[0].euler.yaw_deg - 90.0).abs() < 1e-6);
    }

    #[test]
    fn non_positive_frequency_falls_back_to_default() {
        let config = PollConfig {
            target_hz: 0.0,
            max_samples: None,
        };
        let default_interval = PollConfig::default().interval();
        assert_eq!(config.interval(), default_interval);
    }
}
