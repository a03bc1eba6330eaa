use super::fd::SockFd;
use crate::error::RawError;
use crate::reactor;
use crate::reactor::command::Command;
use crate::reactor::io::Waiter;
use crate::reactor::poller::common::Interest;
use crate::reactor::poller::platform::RawFd;

use std::sync::Arc;

/// Raw access to the descriptor of a [`Sock`](super::Sock).
///
/// A `RawSock` runs caller-supplied functions directly against the
/// underlying descriptor while the owner keeps managing its lifecycle.
/// It holds a back-reference to the owner's state, never the
/// descriptor itself: once the owner's close sequence begins, every
/// operation fails with [`RawError::Closed`], including operations
/// already parked waiting for readiness.
///
/// Cloning is cheap; clones observe the same owner.
///
/// # Example
///
/// ```rust,ignore
/// let sock = Sock::from_stream(stream)?;
/// let raw = sock.raw()?;
///
/// raw.control(|fd| {
///     // direct getsockopt/setsockopt against fd
/// })?;
/// ```
#[derive(Clone)]
pub struct RawSock {
    state: Arc<SockFd>,
}

impl RawSock {
    pub(crate) fn new(state: Arc<SockFd>) -> Self {
        Self { state }
    }

    /// Runs `f` exactly once with the raw descriptor.
    ///
    /// A transient reference keeps the owner from releasing the
    /// descriptor for the duration of the call; `control` never
    /// suspends the calling thread. Valid for connection- and
    /// listener-class handles alike.
    ///
    /// Whatever `f` does, including any error it records through its
    /// own captured state, is not inspected or retried.
    ///
    /// # Errors
    ///
    /// [`RawError::Closed`] if the owner's close sequence has begun;
    /// `f` is not invoked in that case.
    pub fn control<F>(&self, mut f: F) -> Result<(), RawError>
    where
        F: FnMut(RawFd),
    {
        let held = self.state.incref()?;

        f(held.fd());

        Ok(())
    }

    /// Runs `f` until it reports completion, waiting for read
    /// readiness between attempts.
    ///
    /// `f` performs a direct non-blocking syscall and returns `true`
    /// when the operation is done. Returning `false` signals the
    /// would-block condition: the calling thread is suspended until
    /// the platform reports the descriptor readable again, then `f` is
    /// re-invoked. Partial-transfer policy is entirely up to `f`.
    ///
    /// # Errors
    ///
    /// - [`RawError::NotSupported`] for listener-class handles; `f` is
    ///   never invoked.
    /// - [`RawError::Closed`] if the owner's close sequence has begun,
    ///   or begins while the thread is suspended.
    pub fn read<F>(&self, f: F) -> Result<(), RawError>
    where
        F: FnMut(RawFd) -> bool,
    {
        self.wait_io(Interest::READ, f)
    }

    /// Runs `f` until it reports completion, waiting for write
    /// readiness between attempts.
    ///
    /// Same contract as [`read`](Self::read), driven by writability.
    pub fn write<F>(&self, f: F) -> Result<(), RawError>
    where
        F: FnMut(RawFd) -> bool,
    {
        self.wait_io(Interest::WRITE, f)
    }

    fn wait_io<F>(&self, interest: Interest, mut f: F) -> Result<(), RawError>
    where
        F: FnMut(RawFd) -> bool,
    {
        // Listener-class handles have no data-transfer semantics; this
        // is a structural failure, not a transient one.
        if self.state.is_listener() {
            return Err(RawError::NotSupported);
        }

        // One reference for the whole retry loop: the descriptor stays
        // valid across suspensions, and close wakes us instead of
        // waiting for us.
        let held = self.state.incref()?;

        loop {
            if f(held.fd()) {
                return Ok(());
            }

            let waiter = Waiter::new();

            reactor::handle().send(Command::Register {
                state: self.state.clone(),
                waiter: waiter.clone(),
                interest,
            });

            if !waiter.wait() {
                return Err(RawError::Closed);
            }
        }
    }
}
