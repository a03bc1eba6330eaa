#![cfg(unix)]

use rawsock::{RawError, Sock};

use std::io;
use std::mem;
use std::net::TcpListener;

#[test]
fn listener_refuses_read_write() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let sock = Sock::from_listener(listener).expect("failed to wrap listener");
    let raw = sock.raw().expect("failed to get raw accessor");

    let mut called = false;

    assert_eq!(
        raw.write(|_| {
            called = true;
            true
        }),
        Err(RawError::NotSupported),
        "write on a listener should fail"
    );
    assert!(!called, "write ran the function on a listener");

    assert_eq!(
        raw.read(|_| {
            called = true;
            true
        }),
        Err(RawError::NotSupported),
        "read on a listener should fail"
    );
    assert!(!called, "read ran the function on a listener");
}

#[test]
fn listener_control_works_until_close() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let sock = Sock::from_listener(listener).expect("failed to wrap listener");
    let raw = sock.raw().expect("failed to get raw accessor");

    let mut operr: Option<io::Error> = None;

    raw.control(|fd| {
        let mut value: libc::c_int = 0;
        let mut len = mem::size_of::<libc::c_int>() as libc::socklen_t;

        let rc = unsafe {
            libc::getsockopt(
                fd,
                libc::SOL_SOCKET,
                libc::SO_REUSEADDR,
                &mut value as *mut _ as *mut _,
                &mut len,
            )
        };

        if rc < 0 {
            operr = Some(io::Error::last_os_error());
        }
    })
    .expect("control should work on a listener");
    assert!(operr.is_none(), "getsockopt failed: {:?}", operr);

    sock.close();

    let mut called = false;
    assert_eq!(raw.control(|_| called = true), Err(RawError::Closed));
    assert!(!called, "control ran the function after close");
}
