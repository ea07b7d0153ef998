//! Length-prefixed framing for headset byte streams.
//!
//! Every frame on the wire is:
//! - A 4-byte big-endian unsigned payload length
//! - The payload bytes
//!
//! No magic number, no checksum, no versioning. The sender is a headset
//! pushing encoded video; the framing layer's only job is to hand complete
//! payloads to the receiver, one at a time.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
