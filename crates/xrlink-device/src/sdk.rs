use crate::error::Result;

/// Capability interface over the proprietary headset SDK.
///
/// The SDK is an external collaborator: implementations own whatever
/// global state the vendor library requires, and everything above this
/// trait stays free of it. Lifecycle is explicit — `init` before any
/// query, `close` when done.
pub trait HeadsetSdk {
    /// Initialize the SDK session. Must be called before any query.
    fn init(&mut self) -> Result<()>;

    /// Release the SDK session.
    fn close(&mut self) -> Result<()>;

    /// Current headset pose vector.
    ///
    /// Layout: at least 7 elements, with indices 3..=6 carrying the
    /// orientation quaternion as `qx, qy, qz, qw`. Indices 0..=2 are the
    /// position and are not interpreted here.
    fn headset_pose(&mut self) -> Result<Vec<f64>>;

    /// Device timestamp in nanoseconds.
    ///
    /// Zero means the device has not produced a valid sample yet
    /// (warm-up); callers retry until it goes nonzero.
    fn timestamp_ns(&mut self) -> Result<u64>;
}
