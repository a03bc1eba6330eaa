use super::command::Command;
use super::event::Event;
use super::io::IoEntry;
use super::poller::platform::RawFd;
use super::poller::{Poller, Waker};
use crate::utils::Slab;

use std::collections::HashMap;
use std::io;
use std::sync::mpsc::{Receiver, SendError, Sender, channel};
use std::sync::{Arc, OnceLock};
use std::thread;

/// Sending side of the reactor.
///
/// Every command send interrupts the poller so the reactor picks the
/// command up promptly even while blocked waiting for readiness.
pub(crate) struct ReactorHandle {
    sender: Sender<Command>,
    waker: Arc<Waker>,
}

impl ReactorHandle {
    pub(crate) fn send(&self, command: Command) {
        match self.sender.send(command) {
            Ok(()) => self.waker.wake(),

            // The reactor is gone; nothing will ever resolve this
            // registration, so fail it instead of parking the caller
            // forever.
            Err(SendError(Command::Register { waiter, .. })) => waiter.abort(),
            Err(SendError(Command::CloseFd { .. })) => {}
        }
    }
}

/// Returns the process-wide reactor handle, spawning the reactor
/// thread on first use.
pub(crate) fn handle() -> &'static ReactorHandle {
    static HANDLE: OnceLock<ReactorHandle> = OnceLock::new();

    HANDLE.get_or_init(|| {
        let (mut reactor, handle) = Reactor::new();

        thread::Builder::new()
            .name("rawsock-reactor".into())
            .spawn(move || {
                let _ = reactor.run();
            })
            .expect("failed to spawn reactor thread");

        handle
    })
}

pub(crate) struct Reactor {
    receiver: Receiver<Command>,

    poller: Poller,
    events: Vec<Event>,

    /// Registered descriptors, indexed by poller token.
    io: Slab<IoEntry>,

    /// Token lookup by descriptor, used by close teardown.
    tokens: HashMap<RawFd, usize>,
}

impl Reactor {
    pub(crate) fn new() -> (Self, ReactorHandle) {
        let (sender, receiver) = channel();
        let poller = Poller::new();
        let waker = poller.waker();

        (
            Self {
                receiver,
                poller,
                events: Vec::with_capacity(64),
                io: Slab::new(64),
                tokens: HashMap::new(),
            },
            ReactorHandle { sender, waker },
        )
    }

    pub(crate) fn run(&mut self) -> io::Result<()> {
        loop {
            let events: Vec<Event> = self.events.drain(..).collect();
            for event in events {
                self.handle_event(event);
            }

            while let Ok(command) = self.receiver.try_recv() {
                match command {
                    Command::Register {
                        state,
                        waiter,
                        interest,
                    } => {
                        // A close may have raced ahead of this
                        // registration; parking now would hang forever.
                        if state.is_closing() {
                            waiter.abort();
                            continue;
                        }

                        let fd = state.fd();

                        match self.tokens.get(&fd) {
                            Some(&token) => {
                                let entry =
                                    self.io.get_mut(token).expect("token map out of sync");

                                // A live entry implies a parked waiter
                                // holding a reference, so the number
                                // cannot have been reused yet.
                                debug_assert!(Arc::ptr_eq(&entry.state, &state));

                                entry.push(waiter, interest);

                                let interest = entry.interest();
                                self.poller.reregister(fd, token, interest);
                            }
                            None => {
                                let mut entry = IoEntry::new(state);
                                entry.push(waiter, interest);

                                let interest = entry.interest();
                                let token = self.io.insert(entry);

                                self.tokens.insert(fd, token);
                                self.poller.register(fd, token, interest);
                            }
                        }
                    }
                    Command::CloseFd { state } => {
                        let fd = state.fd();

                        if let Some(&token) = self.tokens.get(&fd) {
                            let entry = self.io.get_mut(token).expect("token map out of sync");

                            // A stale teardown from the descriptor
                            // number's previous owner must not touch a
                            // registration made by the next one.
                            if !Arc::ptr_eq(&entry.state, &state) {
                                continue;
                            }

                            let entry = self.io.remove(token);
                            self.tokens.remove(&fd);

                            self.poller.deregister(fd);
                            entry.abort_all();
                        }
                    }
                }
            }

            if let Err(err) = self.poller.poll(&mut self.events) {
                // The reactor cannot continue; leaving waiters parked
                // would hang their threads.
                self.abort_all();
                return Err(err);
            }
        }
    }

    /// Fails every parked waiter when the reactor can no longer run.
    fn abort_all(&mut self) {
        for (fd, token) in self.tokens.drain() {
            let entry = self.io.remove(token);

            self.poller.deregister(fd);
            entry.abort_all();
        }
    }

    fn handle_event(&mut self, event: Event) {
        // The entry may already be gone if a close tore it down after
        // the poller reported readiness.
        let Some(entry) = self.io.get_mut(event.token) else {
            return;
        };

        if event.readable {
            for waiter in entry.read_waiters.drain(..) {
                waiter.wake();
            }
        }

        if event.writable {
            for waiter in entry.write_waiters.drain(..) {
                waiter.wake();
            }
        }

        let fd = entry.fd();
        let drained = entry.is_empty();
        let interest = entry.interest();

        if drained {
            self.io.remove(event.token);
            self.tokens.remove(&fd);
            self.poller.deregister(fd);
        } else {
            self.poller.reregister(fd, event.token, interest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::fd::SockFd;
    use crate::reactor::io::Waiter;
    use crate::reactor::poller::common::Interest;

    #[test]
    fn send_to_dead_reactor_aborts_waiter() {
        let (reactor, handle) = Reactor::new();

        // Tear the receiving side down before anything is sent.
        drop(reactor);

        // The descriptor is never dereferenced on this path; the send
        // fails before any registration happens.
        let state = SockFd::new(0, false);
        let waiter = Waiter::new();

        handle.send(Command::Register {
            state,
            waiter: waiter.clone(),
            interest: Interest::READ,
        });

        assert!(
            !waiter.wait(),
            "waiter parked even though the reactor is gone"
        );
    }
}
