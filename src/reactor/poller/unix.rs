//! Unix platform shims.
//!
//! Thin wrappers over the handful of syscalls the crate issues on its
//! own behalf. The actual data transfer happens inside caller-supplied
//! closures, which talk to the descriptor directly.

use libc::{F_GETFL, F_SETFL, O_NONBLOCK, close, fcntl};

use std::io;

/// Raw socket descriptor type on Unix.
pub type RawFd = std::os::fd::RawFd;

/// Closes a socket descriptor.
pub(crate) fn sys_close(fd: RawFd) {
    unsafe { close(fd) };
}

/// Sets a descriptor to non-blocking mode.
pub(crate) fn sys_set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { fcntl(fd, F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let rc = unsafe { fcntl(fd, F_SETFL, flags | O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}
