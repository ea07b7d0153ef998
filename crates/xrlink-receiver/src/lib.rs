//! Single-session TCP receiver for length-prefixed headset streams.
//!
//! [`StreamReceiver`] owns a listening socket and services one connection
//! at a time: decode frames, feed the in-memory buffer and rate tracker,
//! optionally append payloads to a [`PersistenceSink`]. A session that
//! dies — peer disconnect, truncated frame, I/O error — sends the
//! receiver back to accepting; only bind failure or an external interrupt
//! ends the process.

pub mod config;
pub mod error;
pub mod receiver;
pub mod sink;
mod sockopt;

pub use config::{ReceiverConfig, SinkConfig};
pub use error::{ReceiverError, Result};
pub use receiver::{ReceiverStats, SessionEnd, StreamReceiver};
pub use sink::{FileSink, PersistenceSink};
