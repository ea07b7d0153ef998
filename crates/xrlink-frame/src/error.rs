/// Errors that can occur while framing or de-framing a stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The peer closed the connection cleanly at a frame boundary.
    #[error("end of stream (peer closed at frame boundary)")]
    EndOfStream,

    /// The 4-byte prefix declared a zero payload length.
    ///
    /// This is a per-frame condition: the caller may log it and keep
    /// reading from the same connection.
    #[error("invalid declared frame length: {declared}")]
    InvalidLength { declared: u32 },

    /// The peer closed before the declared byte count arrived.
    #[error("incomplete frame ({received} of {expected} bytes received)")]
    IncompleteFrame { expected: usize, received: usize },

    /// The declared payload length exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Whether the session can continue reading after this error.
    ///
    /// Only a zero declared length is recoverable: the prefix consumed no
    /// payload bytes, so the stream is still positioned at the next header.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FrameError::InvalidLength { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
