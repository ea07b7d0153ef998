/// Errors surfaced by device SDK adapters.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// SDK initialization failed. Fatal for the whole run.
    #[error("device SDK initialization failed: {reason}")]
    Init { reason: String },

    /// A query was made before `init()` or after `close()`.
    #[error("device SDK not initialized")]
    NotInitialized,

    /// A pose or timestamp query failed.
    #[error("device poll failed: {reason}")]
    Poll { reason: String },

    /// The pose vector did not carry the expected quaternion layout.
    #[error("headset pose vector too short ({len} elements, need {min})")]
    MalformedPose { len: usize, min: usize },

    /// SDK shutdown failed. Logged only; never blocks shutdown.
    #[error("device SDK shutdown failed: {reason}")]
    Close { reason: String },
}

pub type Result<T> = std::result::Result<T, SdkError>;
