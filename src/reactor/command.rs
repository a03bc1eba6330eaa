use super::io::Waiter;
use super::poller::common::Interest;
use crate::net::fd::SockFd;

use std::sync::Arc;

pub(crate) enum Command {
    /// Park a waiter until the owner's descriptor reports readiness.
    ///
    /// The owner state travels with the registration so the reactor can
    /// detect a close that raced ahead of it and abort the waiter
    /// instead of parking it against a dying descriptor.
    Register {
        state: Arc<SockFd>,
        waiter: Arc<Waiter>,
        interest: Interest,
    },

    /// Tear down every registration for a closing owner and abort its
    /// parked waiters.
    ///
    /// Carries the owner state, not a bare descriptor: descriptor
    /// numbers are reused by the platform, and a stale teardown must
    /// never hit a registration made by the number's next owner.
    CloseFd { state: Arc<SockFd> },
}
