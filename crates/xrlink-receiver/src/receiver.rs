use std::io::Read;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};
use xrlink_frame::{FrameError, FrameReader};
use xrlink_telemetry::{BoundedFrameBuffer, RateTracker};

use crate::config::ReceiverConfig;
use crate::error::{ReceiverError, Result};
use crate::sink::PersistenceSink;
use crate::sockopt;

/// Cumulative counters owned by a receiver instance.
///
/// Invalid-length frames are skipped without touching `total_packets`;
/// only fully received frames count.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReceiverStats {
    /// Complete frames accepted across all sessions.
    pub total_packets: u64,
    /// Payload bytes accepted across all sessions.
    pub total_bytes: u64,
    /// Sessions serviced (accept to disconnect).
    pub sessions: u64,
}

impl ReceiverStats {
    /// Total payload bytes in MiB, for human-facing summaries.
    pub fn total_mib(&self) -> f64 {
        self.total_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Why a session ended. Never fatal for the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Peer closed cleanly at a frame boundary.
    PeerClosed,
    /// Peer closed mid-frame; the partial frame was discarded.
    IncompleteFrame,
    /// Framing or socket error (oversized declared length, reset, ...).
    TransportError,
    /// The persistence sink failed; the session is abandoned.
    SinkError,
}

/// Blocking TCP receiver for length-prefixed streams.
///
/// One connection is serviced at a time: `accept` blocks, the session
/// loop decodes frames until the peer goes away, then the receiver loops
/// back to accepting. All counters and telemetry live on the instance.
pub struct StreamReceiver {
    listener: TcpListener,
    config: ReceiverConfig,
    sink: Option<Box<dyn PersistenceSink + Send>>,
    buffer: BoundedFrameBuffer,
    rate: RateTracker,
    stats: ReceiverStats,
}

impl StreamReceiver {
    /// Bind and listen on the configured address.
    ///
    /// Bind failure is fatal for the run. The receive-buffer hint is
    /// applied best-effort and only logged on failure.
    pub fn bind(mut config: ReceiverConfig) -> Result<Self> {
        // Interval of 0 would mean "log/flush never" via modulo; clamp.
        config.print_interval = config.print_interval.max(1);
        config.flush_interval = config.flush_interval.max(1);

        let addr = config.listen_addr();
        let listener = TcpListener::bind(&addr).map_err(|source| ReceiverError::Bind {
            addr: addr.clone(),
            source,
        })?;

        if let Err(err) = sockopt::set_recv_buffer(&listener, config.recv_buffer_size) {
            warn!(%err, "could not apply receive buffer hint");
        }

        info!(
            %addr,
            backlog = config.backlog,
            recv_buffer = config.recv_buffer_size,
            "listening for stream connections"
        );

        let buffer = BoundedFrameBuffer::new(config.buffer_capacity);
        Ok(Self {
            listener,
            config,
            sink: None,
            buffer,
            rate: RateTracker::default(),
            stats: ReceiverStats::default(),
        })
    }

    /// Attach a persistence sink. Payloads are appended in arrival order.
    pub fn with_sink(mut self, sink: Box<dyn PersistenceSink + Send>) -> Self {
        info!(sink = %sink.describe(), "persistence enabled");
        self.sink = Some(sink);
        self
    }

    /// The actual bound address (useful when the port was 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept-and-serve loop.
    ///
    /// Runs sessions one at a time until `running` is cleared or the
    /// configured session budget is exhausted, then flushes and closes
    /// the sink and reports final cumulative statistics.
    pub fn serve(&mut self, running: &AtomicBool) -> Result<ReceiverStats> {
        while running.load(Ordering::SeqCst) {
            info!("waiting for client connection");
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(err) => {
                    self.finish();
                    return Err(ReceiverError::Accept(err));
                }
            };
            info!(%peer, "client connected");

            if let Err(err) = sockopt::set_recv_buffer(&stream, self.config.recv_buffer_size) {
                warn!(%peer, %err, "could not apply receive buffer hint to session");
            }

            let end = self.run_session(stream, peer);
            info!(%peer, ?end, "session ended");
            self.stats.sessions += 1;

            if let Some(max) = self.config.max_sessions {
                if self.stats.sessions >= max {
                    break;
                }
            }
        }

        self.finish();
        Ok(self.stats)
    }

    /// Service one connection until it ends.
    ///
    /// Generic over `Read` so sessions can be driven from in-memory
    /// streams in tests; `serve` passes the accepted TCP stream.
    pub fn run_session<R: Read>(&mut self, stream: R, peer: SocketAddr) -> SessionEnd {
        let mut reader = FrameReader::with_config(stream, self.config.frame.clone());

        loop {
            let frame = match reader.read_frame() {
                Ok(frame) => frame,
                Err(FrameError::InvalidLength { declared }) => {
                    warn!(%peer, declared, "invalid frame length, skipping to next header");
                    continue;
                }
                Err(FrameError::EndOfStream) => {
                    info!(%peer, "client disconnected");
                    return SessionEnd::PeerClosed;
                }
                Err(FrameError::IncompleteFrame { expected, received }) => {
                    warn!(%peer, expected, received, "client disconnected mid-frame");
                    return SessionEnd::IncompleteFrame;
                }
                Err(err) => {
                    error!(%peer, %err, "session read failed");
                    return SessionEnd::TransportError;
                }
            };

            self.stats.total_packets += 1;
            self.stats.total_bytes += frame.payload.len() as u64;

            let report_now = self.stats.total_packets % self.config.print_interval == 0;
            if report_now {
                info!(
                    total_packets = self.stats.total_packets,
                    packet_size = frame.payload.len(),
                    declared_len = frame.declared_len,
                    total_bytes = self.stats.total_bytes,
                    total_mib = self.stats.total_mib(),
                    %peer,
                    "reception statistics"
                );
            }

            if let Some(sink) = &mut self.sink {
                if let Err(err) = sink.append(frame.payload.as_ref()) {
                    error!(%peer, %err, "sink append failed, abandoning session");
                    return SessionEnd::SinkError;
                }
                if self.stats.total_packets % self.config.flush_interval == 0 {
                    if let Err(err) = sink.flush() {
                        error!(%peer, %err, "sink flush failed, abandoning session");
                        return SessionEnd::SinkError;
                    }
                }
            }

            if self.config.buffering_enabled {
                let now = Instant::now();
                self.buffer.push(now, frame.payload.clone());
                self.rate.record_sample(now);

                if report_now {
                    let rate_hz = self.rate.rate_hz(Instant::now());
                    info!(
                        buffered = self.buffer.len(),
                        capacity = self.buffer.capacity(),
                        rate_hz,
                        "buffer status"
                    );
                }
            }
        }
    }

    /// Cumulative statistics so far.
    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// The in-memory frame buffer.
    pub fn buffer(&self) -> &BoundedFrameBuffer {
        &self.buffer
    }

    /// Current receive rate in Hz over the sliding window.
    pub fn current_rate_hz(&mut self) -> f64 {
        self.rate.rate_hz(Instant::now())
    }

    /// Shutdown path: flush and close the sink, report final statistics.
    fn finish(&mut self) {
        if let Some(sink) = &mut self.sink {
            if let Err(err) = sink.close() {
                error!(%err, "failed to close persistence sink");
            }
        }
        info!(
            total_packets = self.stats.total_packets,
            total_bytes = self.stats.total_bytes,
            total_mib = self.stats.total_mib(),
            sessions = self.stats.sessions,
            "receiver shut down"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::{BufMut, BytesMut};
    use xrlink_frame::encode_frame;

    use super::*;

    fn test_receiver() -> StreamReceiver {
        let config = ReceiverConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ReceiverConfig::default()
        };
        StreamReceiver::bind(config).expect("loopback bind should succeed")
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().expect("static addr should parse")
    }

    #[test]
    fn session_counts_complete_frames() {
        let mut receiver = test_receiver();

        let mut wire = BytesMut::new();
        encode_frame(&[1u8; 10], &mut wire).unwrap();
        encode_frame(&[2u8; 20], &mut wire).unwrap();

        let end = receiver.run_session(Cursor::new(wire.to_vec()), peer());

        assert_eq!(end, SessionEnd::PeerClosed);
        assert_eq!(receiver.stats().total_packets, 2);
        assert_eq!(receiver.stats().total_bytes, 30);
    }

    #[test]
    fn invalid_length_is_skipped_without_counting() {
        let mut receiver = test_receiver();

        let mut wire = BytesMut::new();
        encode_frame(&[1u8; 10], &mut wire).unwrap();
        wire.put_u32(0); // invalid: zero declared length
        encode_frame(&[3u8; 20], &mut wire).unwrap();

        let end = receiver.run_session(Cursor::new(wire.to_vec()), peer());

        assert_eq!(end, SessionEnd::PeerClosed);
        assert_eq!(receiver.stats().total_packets, 2);
        assert_eq!(receiver.stats().total_bytes, 30);
    }

    #[test]
    fn mid_frame_close_ends_session_as_incomplete() {
        let mut receiver = test_receiver();

        let mut wire = BytesMut::new();
        wire.put_u32(100);
        wire.put_slice(&[0u8; 10]);

        let end = receiver.run_session(Cursor::new(wire.to_vec()), peer());

        assert_eq!(end, SessionEnd::IncompleteFrame);
        assert_eq!(receiver.stats().total_packets, 0);
    }

    #[test]
    fn buffer_tracks_received_frames() {
        let mut receiver = test_receiver();

        let mut wire = BytesMut::new();
        for i in 0..5u8 {
            encode_frame(&[i; 8], &mut wire).unwrap();
        }
        receiver.run_session(Cursor::new(wire.to_vec()), peer());

        assert_eq!(receiver.buffer().len(), 5);
        let snap = receiver.buffer().snapshot();
        assert_eq!(snap[4].payload.as_ref(), &[4u8; 8]);
        assert!(receiver.current_rate_hz() > 0.0);
    }

    #[test]
    fn buffering_can_be_disabled() {
        let config = ReceiverConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            buffering_enabled: false,
            ..ReceiverConfig::default()
        };
        let mut receiver = StreamReceiver::bind(config).unwrap();

        let mut wire = BytesMut::new();
        encode_frame(b"frame", &mut wire).unwrap();
        receiver.run_session(Cursor::new(wire.to_vec()), peer());

        assert!(receiver.buffer().is_empty());
        assert_eq!(receiver.stats().total_packets, 1);
    }

    #[test]
    fn counters_accumulate_across_sessions() {
        let mut receiver = test_receiver();

        let mut first = BytesMut::new();
        encode_frame(b"aa", &mut first).unwrap();
        let mut second = BytesMut::new();
        encode_frame(b"bbb", &mut second).unwrap();

        receiver.run_session(Cursor::new(first.to_vec()), peer());
        receiver.run_session(Cursor::new(second.to_vec()), peer());

        assert_eq!(receiver.stats().total_packets, 2);
        assert_eq!(receiver.stats().total_bytes, 5);
    }

    #[test]
    fn bind_error_is_fatal_and_reported() {
        let config = ReceiverConfig {
            host: "203.0.113.1".to_string(), // TEST-NET, not routable locally
            port: 1,
            ..ReceiverConfig::default()
        };
        assert!(matches!(
            StreamReceiver::bind(config),
            Err(ReceiverError::Bind { .. })
        ));
    }
}
