use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: 4-byte big-endian unsigned payload length.
pub const HEADER_SIZE: usize = 4;

/// Default maximum payload size: 64 MiB.
///
/// The wire format allows lengths up to `u32::MAX`; the cap bounds the
/// allocation a single prefix can demand from the receiver.
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024 * 1024;

/// Default chunk size for incremental payload reads.
pub const DEFAULT_RECV_CHUNK: usize = 64 * 1024;

/// One complete length-prefixed payload unit.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Payload length as declared by the 4-byte prefix.
    pub declared_len: u32,
    /// The payload. Always exactly `declared_len` bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame from a fully received payload.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            declared_len: payload.len() as u32,
            payload,
        }
    }

    /// The total wire size of this frame (prefix + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────┬──────────────────┐
/// │ Length (4B BE) │ Payload          │
/// │ unsigned       │ (Length bytes)   │
/// └────────────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32(payload.len() as u32);
    dst.put_slice(payload);
    Ok(())
}

/// Configuration for frame readers and writers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum accepted payload size in bytes. Default: 64 MiB.
    pub max_payload_size: usize,
    /// Chunk size for incremental payload reads. Default: 64 KiB.
    pub recv_chunk_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            recv_chunk_size: DEFAULT_RECV_CHUNK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_writes_prefix_and_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"headset", &mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE + 7);
        assert_eq!(&buf[..HEADER_SIZE], &7u32.to_be_bytes());
        assert_eq!(&buf[HEADER_SIZE..], b"headset");
    }

    #[test]
    fn encode_prefix_is_big_endian() {
        let mut buf = BytesMut::new();
        encode_frame(&[0u8; 0x0102], &mut buf).unwrap();
        assert_eq!(&buf[..HEADER_SIZE], &[0x00, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn encode_empty_payload_is_zero_prefix() {
        let mut buf = BytesMut::new();
        encode_frame(b"", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0, 0, 0, 0]);
    }

    #[test]
    fn frame_wire_size() {
        let frame = Frame::new(Bytes::from_static(b"test"));
        assert_eq!(frame.declared_len, 4);
        assert_eq!(frame.wire_size(), HEADER_SIZE + 4);
    }
}
