use super::platform::RawFd;

/// Readiness interests for a registered socket.
#[derive(Clone, Copy)]
pub(crate) struct Interest {
    pub(crate) read: bool,
    pub(crate) write: bool,
}

impl Interest {
    pub(crate) const READ: Interest = Interest {
        read: true,
        write: false,
    };

    pub(crate) const WRITE: Interest = Interest {
        read: false,
        write: true,
    };
}

/// Handle used to interrupt a blocking poll from another thread.
///
/// Wraps the platform wake primitive: an `eventfd` on Linux, the send
/// side of a loopback socket pair on Windows. The `wake` implementation
/// lives with the corresponding poller backend.
pub(crate) struct Waker(pub(crate) RawFd);

unsafe impl Send for Waker {}
unsafe impl Sync for Waker {}
