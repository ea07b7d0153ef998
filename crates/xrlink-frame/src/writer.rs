use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes length-prefixed frames to any `Write` stream.
///
/// This is the sender side of the wire format — used by the `send`
/// subcommand and by tests that feed a receiver.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and send one payload (blocking).
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_frame(payload, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => {
                    return Err(FrameError::IncompleteFrame {
                        expected: self.buf.len(),
                        received: offset,
                    })
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_writes_prefixed_frame() {
        let mut writer = FrameWriter::new(Vec::new());
        writer.send(b"abc").unwrap();

        let wire = writer.into_inner();
        assert_eq!(&wire[..4], &3u32.to_be_bytes());
        assert_eq!(&wire[4..], b"abc");
    }

    #[test]
    fn send_rejects_oversized_payload() {
        let cfg = FrameConfig {
            max_payload_size: 4,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Vec::new(), cfg);
        assert!(matches!(
            writer.send(b"too-long").unwrap_err(),
            FrameError::PayloadTooLarge { .. }
        ));
    }

    #[test]
    fn consecutive_sends_concatenate() {
        let mut writer = FrameWriter::new(Vec::new());
        writer.send(b"a").unwrap();
        writer.send(b"bb").unwrap();

        let wire = writer.into_inner();
        assert_eq!(wire.len(), 4 + 1 + 4 + 2);
        assert_eq!(&wire[..4], &1u32.to_be_bytes());
        assert_eq!(&wire[5..9], &2u32.to_be_bytes());
    }
}
