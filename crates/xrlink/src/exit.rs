use std::fmt;
use std::io;

use xrlink_device::SdkError;
use xrlink_frame::FrameError;
use xrlink_receiver::ReceiverError;

// Exit code constants. 64 follows sysexits EX_USAGE; the rest partition
// failures by subsystem so scripts can tell a bind failure from a device
// failure.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const NETWORK_ERROR: i32 = 3;
pub const DEVICE_ERROR: i32 = 30;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => FAILURE,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::AddrInUse
        | io::ErrorKind::AddrNotAvailable => NETWORK_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn receiver_error(context: &str, err: ReceiverError) -> CliError {
    match err {
        ReceiverError::Bind { .. } | ReceiverError::Accept(_) => {
            CliError::new(NETWORK_ERROR, format!("{context}: {err}"))
        }
        ReceiverError::SinkCreate(source) => io_error(context, source),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PayloadTooLarge { .. } | FrameError::InvalidLength { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::EndOfStream | FrameError::IncompleteFrame { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

pub fn sdk_error(context: &str, err: SdkError) -> CliError {
    match err {
        SdkError::Init { .. } | SdkError::NotInitialized => {
            CliError::new(DEVICE_ERROR, format!("{context}: {err}"))
        }
        SdkError::MalformedPose { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}
