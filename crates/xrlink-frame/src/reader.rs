use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::codec::{Frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Reads complete length-prefixed frames from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete frames.
/// A zero declared length returns [`FrameError::InvalidLength`] without
/// consuming payload bytes, so the caller can keep reading from the same
/// stream; see [`FrameError::is_recoverable`].
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::EndOfStream)` when the peer closes at a
    /// frame boundary, `Err(FrameError::IncompleteFrame)` when it closes
    /// mid-frame.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let declared = self.read_header()?;

        if declared == 0 {
            return Err(FrameError::InvalidLength { declared });
        }

        let len = declared as usize;
        if len > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: len,
                max: self.config.max_payload_size,
            });
        }

        let payload = self.read_payload(len)?;
        Ok(Frame {
            declared_len: declared,
            payload,
        })
    }

    /// Read exactly the 4-byte length prefix.
    ///
    /// Zero bytes before the first header byte means a clean close.
    fn read_header(&mut self) -> Result<u32> {
        let mut header = [0u8; HEADER_SIZE];
        let mut filled = 0usize;

        while filled < HEADER_SIZE {
            match self.inner.read(&mut header[filled..]) {
                Ok(0) if filled == 0 => return Err(FrameError::EndOfStream),
                Ok(0) => {
                    return Err(FrameError::IncompleteFrame {
                        expected: HEADER_SIZE,
                        received: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        Ok(u32::from_be_bytes(header))
    }

    /// Read exactly `len` payload bytes.
    ///
    /// Two-tier strategy: one bulk read against the whole remainder picks
    /// up everything the kernel already has queued, then an incremental
    /// loop accumulates bounded chunks until the declared count is
    /// satisfied or the peer closes early.
    fn read_payload(&mut self, len: usize) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(len);

        let mut filled = loop {
            match self.inner.read(&mut buf[..]) {
                Ok(0) => {
                    return Err(FrameError::IncompleteFrame {
                        expected: len,
                        received: 0,
                    })
                }
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        };

        while filled < len {
            let end = len.min(filled + self.config.recv_chunk_size);
            match self.inner.read(&mut buf[filled..end]) {
                Ok(0) => {
                    return Err(FrameError::IncompleteFrame {
                        expected: len,
                        received: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        Ok(buf.freeze())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
