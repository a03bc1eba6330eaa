//! Windows `WSAPoll`-based poller.
//!
//! Readiness-based Windows backend mirroring the semantics of the Linux
//! `epoll` poller over non-blocking sockets and `WSAPoll`.
//!
//! Responsibilities:
//! - register sockets with read/write interests,
//! - block waiting for readiness,
//! - return early when another thread wakes the poller.
//!
//! The wake mechanism is a connected loopback UDP socket pair: sending a
//! byte on the send side interrupts a blocking `WSAPoll` call.

use super::common::Interest;
use super::platform::{RawFd, ensure_winsock};

use crate::reactor::event::Event;
use crate::reactor::poller::Waker;

use std::collections::HashMap;
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;

use windows_sys::Win32::Networking::WinSock::{
    AF_INET, FIONBIO, INVALID_SOCKET, IPPROTO_UDP, POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLOUT,
    SOCK_DGRAM, SOCKADDR_IN, SOCKET, SOCKET_ERROR, WSAPOLLFD, WSAPoll, WSASocketW, bind,
    closesocket, connect, getsockname, ioctlsocket, recv, send,
};

/// Windows poller based on `WSAPoll`.
pub(crate) struct WsaPoller {
    /// Registered sockets: `fd -> (token, interest)`.
    reg: HashMap<RawFd, (usize, Interest)>,

    /// Wake-up socket (receive side).
    wake_recv: SOCKET,

    /// Waker used by the reactor handle to interrupt polling.
    waker: Arc<Waker>,
}

unsafe impl Send for WsaPoller {}

impl Waker {
    /// Wake the poller.
    ///
    /// Sends a single byte on the internal UDP socket, causing `WSAPoll`
    /// to return immediately.
    pub(crate) fn wake(&self) {
        unsafe {
            let buf = [1u8; 1];
            let _ = send(self.0 as SOCKET, buf.as_ptr(), 1, 0);
        }
    }
}

impl WsaPoller {
    /// Create a new `WsaPoller`.
    ///
    /// Initializes Winsock (once per process) and sets up the
    /// non-blocking loopback UDP socket pair used for wake-ups.
    pub(crate) fn new() -> Self {
        unsafe {
            ensure_winsock();

            let recv_sock = WSASocketW(
                AF_INET as i32,
                SOCK_DGRAM,
                IPPROTO_UDP,
                std::ptr::null(),
                0,
                0,
            );
            assert!(recv_sock != INVALID_SOCKET, "wake socket failed");

            let mut nonblocking: u32 = 1;
            let _ = ioctlsocket(recv_sock, FIONBIO, &mut nonblocking);

            let mut addr: SOCKADDR_IN = std::mem::zeroed();
            addr.sin_family = AF_INET;
            addr.sin_port = 0;
            addr.sin_addr.S_un.S_addr = u32::from_ne_bytes(Ipv4Addr::LOCALHOST.octets());

            let rc = bind(
                recv_sock,
                &addr as *const _ as *const _,
                std::mem::size_of::<SOCKADDR_IN>() as i32,
            );
            assert!(rc != SOCKET_ERROR, "wake socket bind failed");

            let mut bound: SOCKADDR_IN = std::mem::zeroed();
            let mut len = std::mem::size_of::<SOCKADDR_IN>() as i32;

            let rc = getsockname(recv_sock, &mut bound as *mut _ as *mut _, &mut len);
            assert!(rc != SOCKET_ERROR, "wake socket getsockname failed");

            let send_sock = WSASocketW(
                AF_INET as i32,
                SOCK_DGRAM,
                IPPROTO_UDP,
                std::ptr::null(),
                0,
                0,
            );
            assert!(send_sock != INVALID_SOCKET, "wake socket failed");

            let _ = ioctlsocket(send_sock, FIONBIO, &mut nonblocking);

            let rc = connect(
                send_sock,
                &bound as *const _ as *const _,
                std::mem::size_of::<SOCKADDR_IN>() as i32,
            );
            assert!(rc != SOCKET_ERROR, "wake socket connect failed");

            Self {
                reg: HashMap::new(),
                wake_recv: recv_sock,
                waker: Arc::new(Waker(send_sock as RawFd)),
            }
        }
    }

    /// Return the poller waker.
    pub(crate) fn waker(&self) -> Arc<Waker> {
        self.waker.clone()
    }

    /// Register a socket with the poller.
    pub(crate) fn register(&mut self, fd: RawFd, token: usize, interest: Interest) {
        self.reg.insert(fd, (token, interest));
    }

    /// Update interest flags for a registered socket.
    pub(crate) fn reregister(&mut self, fd: RawFd, token: usize, interest: Interest) {
        self.reg.insert(fd, (token, interest));
    }

    /// Remove a socket from the poller.
    pub(crate) fn deregister(&mut self, fd: RawFd) {
        self.reg.remove(&fd);
    }

    /// Block until at least one registered socket becomes ready or the
    /// wake-up socket is triggered.
    pub(crate) fn poll(&mut self, events: &mut Vec<Event>) -> io::Result<()> {
        events.clear();

        let mut fds: Vec<WSAPOLLFD> = Vec::with_capacity(self.reg.len() + 1);

        fds.push(WSAPOLLFD {
            fd: self.wake_recv,
            events: POLLIN,
            revents: 0,
        });

        for (&fd, &(_, interest)) in self.reg.iter() {
            let mut ev = 0;
            if interest.read {
                ev |= POLLIN;
            }
            if interest.write {
                ev |= POLLOUT;
            }

            fds.push(WSAPOLLFD {
                fd: fd as SOCKET,
                events: ev,
                revents: 0,
            });
        }

        let rc = unsafe { WSAPoll(fds.as_mut_ptr(), fds.len() as u32, -1) };
        if rc == SOCKET_ERROR {
            return Err(io::Error::last_os_error());
        }

        // Drain the wake-up socket.
        let wake_mask = (POLLIN | POLLERR | POLLHUP | POLLNVAL) as i32;
        if (fds[0].revents as i32 & wake_mask) != 0 {
            unsafe {
                let mut buf = [0u8; 64];
                while recv(
                    self.wake_recv,
                    buf.as_mut_ptr() as *mut _,
                    buf.len() as i32,
                    0,
                ) > 0
                {}
            }
        }

        for pfd in fds.iter().skip(1) {
            let re = pfd.revents as i32;
            if re == 0 {
                continue;
            }

            let fd = pfd.fd as RawFd;
            if let Some(&(token, _)) = self.reg.get(&fd) {
                events.push(Event {
                    token,
                    readable: (re & (POLLIN | POLLERR | POLLHUP | POLLNVAL) as i32) != 0,
                    writable: (re & (POLLOUT | POLLERR | POLLHUP | POLLNVAL) as i32) != 0,
                });
            }
        }

        Ok(())
    }
}

impl Drop for WsaPoller {
    fn drop(&mut self) {
        unsafe {
            let _ = closesocket(self.wake_recv);
            let _ = closesocket(self.waker.0 as SOCKET);
        }
    }
}
