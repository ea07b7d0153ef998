//! In-memory telemetry for the stream receiver.
//!
//! Two small single-writer structures fed by the receive loop:
//! - [`BoundedFrameBuffer`] — fixed-capacity FIFO of recent frames
//! - [`RateTracker`] — sliding-window frames-per-second estimator
//!
//! Neither is internally synchronized. The receive loop is the only
//! writer; telemetry readers take snapshot copies.

pub mod buffer;
pub mod rate;

pub use buffer::{BoundedFrameBuffer, BufferedFrame, DEFAULT_BUFFER_CAPACITY};
pub use rate::{RateTracker, DEFAULT_RATE_WINDOW};
