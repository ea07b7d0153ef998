use std::path::PathBuf;

use xrlink_frame::FrameConfig;

/// Configuration for [`crate::StreamReceiver`].
///
/// Defaults mirror the constants the receiver shipped with: listen on all
/// interfaces at port 12345, a 64 KiB receive-buffer hint, periodic
/// logging and flushing every 10 frames, a 100-frame memory buffer.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Interface to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// `SO_RCVBUF` hint in bytes. Applied best-effort.
    pub recv_buffer_size: usize,
    /// Requested listen backlog. std does not expose `listen(backlog)`;
    /// the value is recorded for parity and logged at bind time.
    pub backlog: u32,
    /// Emit a statistics line every N accepted frames.
    pub print_interval: u64,
    /// Flush the persistence sink every N accepted frames.
    pub flush_interval: u64,
    /// Whether to keep recent frames in the memory buffer.
    pub buffering_enabled: bool,
    /// Capacity of the memory buffer in frames.
    pub buffer_capacity: usize,
    /// Stop serving after this many sessions. `None` = until interrupted.
    pub max_sessions: Option<u64>,
    /// Framing limits passed to the frame reader.
    pub frame: FrameConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 12345,
            recv_buffer_size: 65536,
            backlog: 5,
            print_interval: 10,
            flush_interval: 10,
            buffering_enabled: true,
            buffer_capacity: 100,
            max_sessions: None,
            frame: FrameConfig::default(),
        }
    }
}

impl ReceiverConfig {
    /// The `host:port` string handed to the TCP bind call.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for [`crate::FileSink`].
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Directory to create output files in. Created if missing.
    pub output_dir: PathBuf,
    /// Filename prefix; a Unix-seconds timestamp is appended.
    pub file_prefix: String,
    /// Filename extension, without the dot.
    pub file_extension: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("video_output"),
            file_prefix: "received_video".to_string(),
            file_extension: "h265".to_string(),
        }
    }
}
