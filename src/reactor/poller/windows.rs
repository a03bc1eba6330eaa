//! Windows platform shims.
//!
//! Mirrors the Unix shim layer for WinSock sockets: descriptor type
//! alias, one-time Winsock initialization, close, and non-blocking mode.

use std::io;
use std::mem;
use std::sync::Once;

use windows_sys::Win32::Networking::WinSock::{
    FIONBIO, SOCKET, SOCKET_ERROR, WSADATA, WSAStartup, closesocket, ioctlsocket,
};

/// Raw socket descriptor type on Windows (a WinSock `SOCKET`).
pub type RawFd = std::os::windows::io::RawSocket;

/// Creates a MAKEWORD value for the Winsock version.
#[inline]
const fn makeword(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | (low as u16)
}

/// Winsock initialization guard.
static WINSOCK_INIT: Once = Once::new();

/// Initialize Winsock if not already initialized.
pub(crate) fn ensure_winsock() {
    WINSOCK_INIT.call_once(|| unsafe {
        let mut data: WSADATA = mem::zeroed();
        let rc = WSAStartup(makeword(2, 2), &mut data as *mut _);
        assert_eq!(rc, 0, "WSAStartup failed: {}", rc);
    });
}

/// Closes a socket descriptor.
pub(crate) fn sys_close(fd: RawFd) {
    unsafe {
        let _ = closesocket(fd as SOCKET);
    }
}

/// Sets a socket to non-blocking mode.
pub(crate) fn sys_set_nonblocking(fd: RawFd) -> io::Result<()> {
    let mut nonblocking: u32 = 1;

    let rc = unsafe { ioctlsocket(fd as SOCKET, FIONBIO, &mut nonblocking) };
    if rc == SOCKET_ERROR {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}
