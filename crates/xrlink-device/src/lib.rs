//! Headset device access for xrlink.
//!
//! The proprietary device SDK is reached through the narrow [`HeadsetSdk`]
//! capability trait — explicit init/close lifecycle plus two queries (pose
//! vector, timestamp). Nothing in this crate links against vendor code;
//! [`SimulatedHeadset`] stands in for the real device so the pose loop is
//! runnable and testable anywhere, and an SDK binding only has to
//! implement the trait.

pub mod error;
pub mod orientation;
pub mod poller;
pub mod sdk;
pub mod simulated;

pub use error::{Result, SdkError};
pub use orientation::{EulerAngles, Quaternion, MIN_POSE_LEN};
pub use poller::{PollConfig, PosePoller, PoseSample};
pub use sdk::HeadsetSdk;
pub use simulated::SimulatedHeadset;
