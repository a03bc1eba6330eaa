/// A readiness event reported by the poller.
///
/// Produced by the platform poller and consumed by the reactor to wake
/// the threads parked on the corresponding descriptor.
pub(crate) struct Event {
    /// Token of the registered descriptor entry.
    pub(crate) token: usize,

    /// The descriptor is readable.
    pub(crate) readable: bool,

    /// The descriptor is writable.
    pub(crate) writable: bool,
}
