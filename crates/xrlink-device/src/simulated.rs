use std::time::Instant;

use tracing::debug;

use crate::error::{Result, SdkError};
use crate::sdk::HeadsetSdk;

/// Simulated headset: a slow rotation about the vertical axis.
///
/// Stands in for the proprietary SDK where no hardware is attached. The
/// pose vector matches the device layout (`[x, y, z, qx, qy, qz, qw]`),
/// timestamps are monotonic nanoseconds since `init`, and the first few
/// timestamp queries return zero to model the device warm-up phase.
#[derive(Debug)]
pub struct SimulatedHeadset {
    started: Option<Instant>,
    yaw_rate_deg_per_sec: f64,
    warmup_polls: u32,
    timestamp_queries: u32,
}

impl SimulatedHeadset {
    /// Create a simulated device.
    ///
    /// `warmup_polls` timestamp queries return zero before the device
    /// "locks on"; `yaw_rate_deg_per_sec` sets the rotation speed.
    pub fn new(yaw_rate_deg_per_sec: f64, warmup_polls: u32) -> Self {
        Self {
            started: None,
            yaw_rate_deg_per_sec,
            warmup_polls,
            timestamp_queries: 0,
        }
    }

    fn elapsed_secs(&self) -> Result<f64> {
        match self.started {
            Some(started) => Ok(started.elapsed().as_secs_f64()),
            None => Err(SdkError::NotInitialized),
        }
    }
}

impl Default for SimulatedHeadset {
    fn default() -> Self {
        // One quarter turn every four seconds, three warm-up polls.
        Self::new(22.5, 3)
    }
}

impl HeadsetSdk for SimulatedHeadset {
    fn init(&mut self) -> Result<()> {
        self.started = Some(Instant::now());
        self.timestamp_queries = 0;
        debug!(
            yaw_rate = self.yaw_rate_deg_per_sec,
            warmup_polls = self.warmup_polls,
            "simulated headset initialized"
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.started.take().is_none() {
            return Err(SdkError::NotInitialized);
        }
        debug!("simulated headset closed");
        Ok(())
    }

    fn headset_pose(&mut self) -> Result<Vec<f64>> {
        let elapsed = self.elapsed_secs()?;
        let half_angle = (self.yaw_rate_deg_per_sec * elapsed).to_radians() / 2.0;

        // Rotation about Z by yaw_rate * t, position pinned at the origin.
        Ok(vec![
            0.0,
            0.0,
            0.0,
            0.0,              // qx
            0.0,              // qy
            half_angle.sin(), // qz
            half_angle.cos(), // qw
        ])
    }

    fn timestamp_ns(&mut self) -> Result<u64> {
        let elapsed = self.elapsed_secs()?;

        if self.timestamp_queries < self.warmup_polls {
            self.timestamp_queries += 1;
            return Ok(0);
        }

        // Never report zero once warmed up; zero means "no sample yet".
        Ok(((elapsed * 1e9) as u64).max(1))
    }
}
