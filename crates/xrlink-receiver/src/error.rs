/// Errors that end the receiver process (session-level failures are
/// handled inside the serve loop and never surface here).
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    /// Could not bind/listen on the configured address. Fatal.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The accept call itself failed. Fatal.
    #[error("accept failed: {0}")]
    Accept(std::io::Error),

    /// The persistence sink could not be created.
    #[error("failed to create persistence sink: {0}")]
    SinkCreate(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReceiverError>;
