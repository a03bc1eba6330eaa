#![cfg(unix)]

use rawsock::{RawError, Sock};

use std::io::{self, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Writes until the kernel send buffer is full and the socket reports
/// the would-block condition.
fn fill_send_buffer(stream: &mut TcpStream) {
    stream
        .set_nonblocking(true)
        .expect("failed to set non-blocking");

    let chunk = [0u8; 64 * 1024];
    loop {
        match stream.write(&chunk) {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => panic!("failed to fill send buffer: {err}"),
        }
    }
}

/// Closing the owner from another thread must wake a read parked on
/// readiness and fail it with `Closed`, without deadlock and without
/// touching a released descriptor.
#[test]
fn close_wakes_parked_read() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let addr = listener.local_addr().expect("failed to get local address");

    // The peer never sends anything, so the raw read parks.
    let stream = TcpStream::connect(addr).expect("failed to connect");
    let sock = Sock::from_stream(stream).expect("failed to wrap stream");
    let raw = sock.raw().expect("failed to get raw accessor");

    let reader = thread::spawn({
        let raw = raw.clone();
        move || {
            raw.read(|fd| {
                let mut buffer = [0u8; 16];
                let n = unsafe { libc::recv(fd, buffer.as_mut_ptr() as *mut _, buffer.len(), 0) };

                if n < 0 && io::Error::last_os_error().kind() == io::ErrorKind::WouldBlock {
                    return false;
                }

                true
            })
        }
    });

    // Give the reader time to park.
    thread::sleep(Duration::from_millis(100));

    // Concurrent control on the same accessor is permitted while the
    // read is suspended.
    let mut controlled = false;
    raw.control(|_| controlled = true)
        .expect("control during parked read failed");
    assert!(controlled);

    sock.close();

    let result = reader.join().expect("reader thread panicked");
    assert_eq!(result, Err(RawError::Closed));
}

/// A close racing several parked operations terminates all of them.
#[test]
fn close_wakes_multiple_parked_readers() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let addr = listener.local_addr().expect("failed to get local address");

    let stream = TcpStream::connect(addr).expect("failed to connect");
    let sock = Sock::from_stream(stream).expect("failed to wrap stream");
    let raw = sock.raw().expect("failed to get raw accessor");

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let raw = raw.clone();
            thread::spawn(move || {
                raw.read(|fd| {
                    let mut buffer = [0u8; 16];
                    let n =
                        unsafe { libc::recv(fd, buffer.as_mut_ptr() as *mut _, buffer.len(), 0) };

                    if n < 0 && io::Error::last_os_error().kind() == io::ErrorKind::WouldBlock {
                        return false;
                    }

                    true
                })
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    sock.close();

    for reader in readers {
        let result = reader.join().expect("reader thread panicked");
        assert_eq!(result, Err(RawError::Closed));
    }
}

/// Closing the owner also wakes a write parked on a full send buffer.
#[test]
fn close_wakes_parked_write() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let addr = listener.local_addr().expect("failed to get local address");

    let mut stream = TcpStream::connect(addr).expect("failed to connect");
    let (peer, _) = listener.accept().expect("failed to accept connection");

    // The peer reads nothing, so the buffers stay full and the raw
    // write parks on writability.
    fill_send_buffer(&mut stream);

    let sock = Sock::from_stream(stream).expect("failed to wrap stream");
    let raw = sock.raw().expect("failed to get raw accessor");

    let writer = thread::spawn({
        let raw = raw.clone();
        move || {
            raw.write(|fd| {
                let data = [0u8; 4096];
                let n = unsafe { libc::send(fd, data.as_ptr() as *const _, data.len(), 0) };

                if n < 0 && io::Error::last_os_error().kind() == io::ErrorKind::WouldBlock {
                    return false;
                }

                true
            })
        }
    });

    // Give the writer time to park.
    thread::sleep(Duration::from_millis(100));
    sock.close();

    let result = writer.join().expect("writer thread panicked");
    assert_eq!(result, Err(RawError::Closed));

    drop(peer);
}
