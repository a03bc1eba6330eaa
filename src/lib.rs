//! # rawsock
//!
//! **rawsock** is a raw socket access layer: it lets a caller run
//! direct platform syscalls (send, receive, socket options) against
//! the descriptor of an already-established connection or listener,
//! while the owning socket object keeps sole control of the
//! descriptor's lifecycle.
//!
//! The crate provides:
//!
//! - A **reference-counted lifecycle** where every operation acquires
//!   a transient reference, so a closed owner fails callers with
//!   [`RawError::Closed`] instead of exposing a stale or reused
//!   descriptor
//! - A **readiness-driven retry loop** that re-runs the caller's
//!   syscall when it would block, suspending the thread on a
//!   process-wide poller (`epoll` on Linux, `WSAPoll` on Windows)
//!   instead of busy polling
//! - **Prompt cancellation** that wakes operations suspended at close
//!   time with a terminal error rather than leaving them parked
//! - **Listener classification** so listener-class handles refuse raw
//!   read/write structurally with [`RawError::NotSupported`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rawsock::Sock;
//!
//! fn main() -> std::io::Result<()> {
//!     let stream = std::net::TcpStream::connect("127.0.0.1:8080")?;
//!     let sock = Sock::from_stream(stream)?;
//!
//!     let raw = sock.raw()?;
//!     raw.control(|fd| {
//!         // run getsockopt/setsockopt directly against fd
//!         let _ = fd;
//!     })?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`net`] — owning sockets ([`Sock`]) and raw accessors
//!   ([`RawSock`])

mod error;
mod reactor;
mod utils;

pub mod net;

pub use error::RawError;
pub use net::{RawSock, Sock};

/// Raw socket descriptor type passed to caller-supplied functions.
///
/// `std::os::fd::RawFd` on Unix, `std::os::windows::io::RawSocket` on
/// Windows.
#[cfg(unix)]
pub use reactor::poller::unix::RawFd;

#[cfg(windows)]
pub use reactor::poller::windows::RawFd;
