use crate::error::RawError;
use crate::reactor;
use crate::reactor::command::Command;
use crate::reactor::poller::platform::{RawFd, sys_close};

use std::sync::{Arc, Mutex};

/// Shared descriptor state of an owning socket.
///
/// `SockFd` is the back-reference target handed to accessors: it
/// carries the descriptor, the listener classification, and the
/// reference state that protects the close transition.
///
/// Lifecycle is Open -> Closing -> Closed, driven solely by the owner:
/// - Open: references can be acquired, operations proceed.
/// - Closing: `close` has been called; new references are refused and
///   parked waiters are being invalidated, but the descriptor stays
///   open while references remain outstanding.
/// - Closed: the last reference is gone and the descriptor has been
///   released to the platform.
pub(crate) struct SockFd {
    /// The underlying descriptor. Valid until the state reaches Closed.
    fd: RawFd,

    /// Listener-class handles refuse raw read/write structurally.
    ///
    /// Recorded explicitly at construction, never inferred from a
    /// syscall failure.
    listener: bool,

    state: Mutex<RefState>,
}

struct RefState {
    /// Transient busy count of in-flight accessor operations.
    refs: usize,

    /// The close sequence has begun; no new references are granted.
    closing: bool,

    /// The descriptor has been released to the platform.
    closed: bool,
}

impl SockFd {
    pub(crate) fn new(fd: RawFd, listener: bool) -> Arc<Self> {
        Arc::new(Self {
            fd,
            listener,
            state: Mutex::new(RefState {
                refs: 0,
                closing: false,
                closed: false,
            }),
        })
    }

    /// Returns the descriptor without lifecycle checks.
    ///
    /// Only meaningful while the caller holds a [`Ref`] or runs on the
    /// reactor thread against a registration that is still alive.
    pub(crate) fn fd(&self) -> RawFd {
        self.fd
    }

    pub(crate) fn is_listener(&self) -> bool {
        self.listener
    }

    pub(crate) fn is_closing(&self) -> bool {
        self.state.lock().unwrap().closing
    }

    /// Acquires a transient reference that keeps the descriptor open.
    ///
    /// Fails with [`RawError::Closed`] once the close sequence has
    /// begun. The returned guard releases the reference on drop, so a
    /// panicking caller closure cannot leak the busy count.
    pub(crate) fn incref(self: &Arc<Self>) -> Result<Ref, RawError> {
        let mut state = self.state.lock().unwrap();

        if state.closing {
            return Err(RawError::Closed);
        }

        state.refs += 1;

        Ok(Ref {
            owner: self.clone(),
        })
    }

    fn decref(&self) {
        let release = {
            let mut state = self.state.lock().unwrap();

            state.refs -= 1;

            if state.closing && state.refs == 0 && !state.closed {
                state.closed = true;
                true
            } else {
                false
            }
        };

        if release {
            sys_close(self.fd);
        }
    }

    /// Begins the close sequence. Idempotent.
    ///
    /// Marks the state as closing, tells the reactor to tear down any
    /// registration for the descriptor and abort parked waiters, and
    /// releases the descriptor immediately when no references are
    /// outstanding. Otherwise the last reference holder releases it.
    /// Close never blocks waiting for in-flight operations.
    pub(crate) fn close(self: &Arc<Self>) {
        let release = {
            let mut state = self.state.lock().unwrap();

            if state.closing {
                return;
            }

            state.closing = true;

            if state.refs == 0 && !state.closed {
                state.closed = true;
                true
            } else {
                false
            }
        };

        // The closing flag is visible before the teardown command is
        // sent; the reactor re-checks it for registrations that arrive
        // after the teardown.
        reactor::handle().send(Command::CloseFd {
            state: self.clone(),
        });

        if release {
            sys_close(self.fd);
        }
    }
}

/// A held transient reference to an owner's descriptor.
///
/// While alive, the owner's close sequence cannot release the
/// descriptor; dropping the guard decrements the busy count and, when
/// it was the last one after close began, performs the release.
pub(crate) struct Ref {
    owner: Arc<SockFd>,
}

impl Ref {
    pub(crate) fn fd(&self) -> RawFd {
        self.owner.fd()
    }
}

impl Drop for Ref {
    fn drop(&mut self) {
        self.owner.decref();
    }
}
