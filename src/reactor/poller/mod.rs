//! Platform-specific readiness poller.
//!
//! This module provides a unified interface over the platform's
//! readiness notification mechanism (`epoll` on Linux, `WSAPoll` on
//! Windows).
//!
//! The reactor uses the poller to:
//! - wait for registered sockets to become readable or writable,
//! - be interrupted when commands arrive from other threads.
//!
//! The concrete backend is selected at compile time depending on the
//! target operating system.

pub(crate) mod common;

pub(crate) use common::Waker;

#[cfg(target_os = "linux")]
mod epoll;

#[cfg(windows)]
mod wsapoll;

#[cfg(target_os = "linux")]
pub(crate) type Poller = epoll::EpollPoller;

#[cfg(windows)]
pub(crate) type Poller = wsapoll::WsaPoller;

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(unix)]
pub(crate) use unix as platform;

#[cfg(windows)]
pub(crate) mod windows;

#[cfg(windows)]
pub(crate) use windows as platform;
