use super::fd::SockFd;
use super::raw::RawSock;
use crate::error::RawError;
use crate::reactor::poller::platform::{RawFd, sys_close, sys_set_nonblocking};

use std::io;
use std::net;
use std::sync::Arc;

/// An owning wrapper around a socket descriptor.
///
/// `Sock` is the owner side of the raw access contract: it holds the
/// descriptor taken over from a `std::net` socket, switches it to
/// non-blocking mode, and remains the only party allowed to close it.
/// Accessors handed out by [`raw`](Self::raw) borrow the descriptor
/// through transient references and are invalidated the instant
/// [`close`](Self::close) runs.
///
/// Dialing and binding stay with `std::net`; wrap the socket once it
/// is established.
pub struct Sock {
    state: Arc<SockFd>,
}

impl Sock {
    /// Takes ownership of a connected TCP stream's descriptor.
    pub fn from_stream(stream: net::TcpStream) -> io::Result<Self> {
        Self::wrap(into_raw(stream), false)
    }

    /// Takes ownership of a TCP listener's descriptor.
    ///
    /// The handle is recorded as listener-class: raw read and write
    /// refuse to run against it.
    pub fn from_listener(listener: net::TcpListener) -> io::Result<Self> {
        Self::wrap(into_raw(listener), true)
    }

    /// Takes ownership of a UDP socket's descriptor.
    pub fn from_datagram(socket: net::UdpSocket) -> io::Result<Self> {
        Self::wrap(into_raw(socket), false)
    }

    fn wrap(fd: RawFd, listener: bool) -> io::Result<Self> {
        // Raw read/write rely on the would-block condition; a blocking
        // descriptor would park inside the caller's syscall instead of
        // the readiness wait.
        if let Err(err) = sys_set_nonblocking(fd) {
            sys_close(fd);
            return Err(err);
        }

        Ok(Self {
            state: SockFd::new(fd, listener),
        })
    }

    /// Returns a raw accessor for this socket.
    ///
    /// # Errors
    ///
    /// [`RawError::Closed`] once the close sequence has begun.
    pub fn raw(&self) -> Result<RawSock, RawError> {
        if self.state.is_closing() {
            return Err(RawError::Closed);
        }

        Ok(RawSock::new(self.state.clone()))
    }

    /// Closes the socket. Idempotent.
    ///
    /// Accessor operations issued after this point fail with
    /// [`RawError::Closed`], and threads suspended in raw read/write
    /// wake promptly with the same error. The descriptor itself is
    /// released once the last in-flight operation lets go of it.
    pub fn close(&self) {
        self.state.close();
    }
}

impl Drop for Sock {
    fn drop(&mut self) {
        self.state.close();
    }
}

#[cfg(unix)]
fn into_raw<T: std::os::fd::IntoRawFd>(socket: T) -> RawFd {
    socket.into_raw_fd()
}

#[cfg(windows)]
fn into_raw<T: std::os::windows::io::IntoRawSocket>(socket: T) -> RawFd {
    socket.into_raw_socket()
}
