use std::collections::VecDeque;
use std::time::Instant;

use bytes::Bytes;

/// Default maximum number of buffered frames.
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// One buffered frame. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct BufferedFrame {
    /// When the frame was fully received.
    pub received_at: Instant,
    /// The frame payload.
    pub payload: Bytes,
}

/// Fixed-capacity frame buffer with strict FIFO eviction.
///
/// When full, a push evicts the oldest entry before inserting the new one,
/// so the buffer always holds the most recent `capacity` frames.
#[derive(Debug)]
pub struct BoundedFrameBuffer {
    frames: VecDeque<BufferedFrame>,
    capacity: usize,
}

impl BoundedFrameBuffer {
    /// Create a buffer holding at most `capacity` frames.
    ///
    /// A zero capacity is clamped to 1 so a push always retains the
    /// newest frame.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert a frame, evicting the oldest entry if at capacity.
    pub fn push(&mut self, received_at: Instant, payload: Bytes) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(BufferedFrame {
            received_at,
            payload,
        });
    }

    /// Number of frames currently held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Configured maximum number of frames.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of the buffered frames, oldest first / most recent last.
    ///
    /// Payloads are `Bytes`, so the copy is cheap (reference-counted).
    pub fn snapshot(&self) -> Vec<BufferedFrame> {
        self.frames.iter().cloned().collect()
    }
}

impl Default for BoundedFrameBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(i: usize) -> Bytes {
        Bytes::from(format!("frame-{i}"))
    }

    #[test]
    fn fills_to_capacity() {
        let mut buffer = BoundedFrameBuffer::new(4);
        let now = Instant::now();

        for i in 0..4 {
            buffer.push(now, payload(i));
        }

        assert_eq!(buffer.len(), 4);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn evicts_oldest_first_beyond_capacity() {
        let mut buffer = BoundedFrameBuffer::new(3);
        let now = Instant::now();

        for i in 0..10 {
            buffer.push(now, payload(i));
        }

        assert_eq!(buffer.len(), 3);
        let retained: Vec<_> = buffer
            .snapshot()
            .into_iter()
            .map(|f| f.payload)
            .collect();
        assert_eq!(retained, vec![payload(7), payload(8), payload(9)]);
    }

    #[test]
    fn snapshot_is_most_recent_last() {
        let mut buffer = BoundedFrameBuffer::new(8);
        let now = Instant::now();

        buffer.push(now, payload(0));
        buffer.push(now, payload(1));

        let snap = buffer.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].payload, payload(0));
        assert_eq!(snap[1].payload, payload(1));
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut buffer = BoundedFrameBuffer::new(0);
        let now = Instant::now();

        buffer.push(now, payload(0));
        buffer.push(now, payload(1));

        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.snapshot()[0].payload, payload(1));
    }
}
