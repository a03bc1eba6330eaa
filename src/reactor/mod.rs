//! Process-wide readiness notifier.
//!
//! This module implements the reactor behind the raw access layer.
//! The reactor is responsible for:
//! - driving I/O readiness through the platform poller,
//! - waking threads parked in raw read/write retry loops,
//! - tearing down registrations when an owner closes its handle.
//!
//! A single reactor thread is spawned lazily for the whole process and
//! communicates with callers through commands. Users of the crate never
//! interact with it directly; it is internal plumbing used by
//! [`RawSock`](crate::RawSock).

mod core;

pub(crate) mod command;
pub(crate) mod event;
pub(crate) mod io;
pub(crate) mod poller;

pub(crate) use core::handle;
