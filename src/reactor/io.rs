use super::poller::common::Interest;
use super::poller::platform::RawFd;
use crate::net::fd::SockFd;

use std::sync::{Arc, Condvar, Mutex};

/// A thread parked on an I/O readiness wait.
///
/// One-shot: each retry of a raw read/write loop registers a fresh
/// waiter. The parked thread blocks in [`wait`](Waiter::wait) until the
/// reactor resolves the cell with either outcome.
pub(crate) struct Waiter {
    state: Mutex<WaitState>,
    cond: Condvar,
}

enum WaitState {
    /// Not yet resolved; the waiting thread stays parked.
    Pending,

    /// The descriptor reported readiness; retry the operation.
    Ready,

    /// The owner closed the descriptor; the operation must fail.
    Aborted,
}

impl Waiter {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(WaitState::Pending),
            cond: Condvar::new(),
        })
    }

    /// Resolve the wait with readiness.
    pub(crate) fn wake(&self) {
        let mut state = self.state.lock().unwrap();

        if matches!(*state, WaitState::Pending) {
            *state = WaitState::Ready;
            self.cond.notify_one();
        }
    }

    /// Resolve the wait with forced invalidation.
    pub(crate) fn abort(&self) {
        let mut state = self.state.lock().unwrap();

        if matches!(*state, WaitState::Pending) {
            *state = WaitState::Aborted;
            self.cond.notify_one();
        }
    }

    /// Block the calling thread until the wait is resolved.
    ///
    /// Returns `true` on readiness and `false` on forced invalidation.
    pub(crate) fn wait(&self) -> bool {
        let mut state = self.state.lock().unwrap();

        while matches!(*state, WaitState::Pending) {
            state = self.cond.wait(state).unwrap();
        }

        matches!(*state, WaitState::Ready)
    }
}

/// A descriptor registered with the reactor.
///
/// Holds the separate read and write waiter lists for one descriptor;
/// the poller registration for the descriptor carries the union of the
/// interests still represented here. The entry exists only while at
/// least one waiter is parked.
pub(crate) struct IoEntry {
    /// The owner whose descriptor this entry watches.
    ///
    /// Kept for identity: teardown commands only apply when they come
    /// from this exact owner, so a reused descriptor number can never
    /// be confused with its previous owner.
    pub(crate) state: Arc<SockFd>,

    /// Threads waiting for the descriptor to become readable.
    pub(crate) read_waiters: Vec<Arc<Waiter>>,

    /// Threads waiting for the descriptor to become writable.
    pub(crate) write_waiters: Vec<Arc<Waiter>>,
}

impl IoEntry {
    pub(crate) fn new(state: Arc<SockFd>) -> Self {
        Self {
            state,
            read_waiters: Vec::new(),
            write_waiters: Vec::new(),
        }
    }

    pub(crate) fn fd(&self) -> RawFd {
        self.state.fd()
    }

    /// Adds a waiter under the given interest.
    pub(crate) fn push(&mut self, waiter: Arc<Waiter>, interest: Interest) {
        if interest.read {
            self.read_waiters.push(waiter.clone());
        }
        if interest.write {
            self.write_waiters.push(waiter);
        }
    }

    /// Returns the poller interests required by the remaining waiters.
    pub(crate) fn interest(&self) -> Interest {
        Interest {
            read: !self.read_waiters.is_empty(),
            write: !self.write_waiters.is_empty(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.read_waiters.is_empty() && self.write_waiters.is_empty()
    }

    /// Aborts every waiter associated with this entry.
    pub(crate) fn abort_all(self) {
        for waiter in self.read_waiters {
            waiter.abort();
        }

        for waiter in self.write_waiters {
            waiter.abort();
        }
    }
}
