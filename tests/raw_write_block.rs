#![cfg(unix)]

use rawsock::Sock;

use std::io::{self, Read, Write};
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

/// A write parked on a full send buffer resumes once the peer drains
/// and the descriptor becomes writable again.
#[test]
fn write_resumes_when_peer_drains() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let addr = listener.local_addr().expect("failed to get local address");

    let mut stream = TcpStream::connect(addr).expect("failed to connect");
    let (mut peer, _) = listener.accept().expect("failed to accept connection");

    fill_send_buffer(&mut stream);

    let sock = Sock::from_stream(stream).expect("failed to wrap stream");
    let raw = sock.raw().expect("failed to get raw accessor");

    let writer = thread::spawn({
        let raw = raw.clone();
        move || {
            let mut attempts = 0u32;

            let result = raw.write(|fd| {
                attempts += 1;

                let data = [7u8; 1024];
                let n = unsafe { libc::send(fd, data.as_ptr() as *const _, data.len(), 0) };

                if n < 0 && io::Error::last_os_error().kind() == io::ErrorKind::WouldBlock {
                    return false;
                }

                true
            });

            (result, attempts)
        }
    });

    // Let the writer hit the full buffer and park before draining.
    thread::sleep(Duration::from_millis(100));

    peer.set_read_timeout(Some(Duration::from_millis(50)))
        .expect("failed to set read timeout");

    let mut buffer = vec![0u8; 64 * 1024];
    while !writer.is_finished() {
        match peer.read(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::TimedOut => {}
            Err(err) => panic!("failed to drain peer: {err}"),
        }
    }

    let (result, attempts) = writer.join().expect("writer thread panicked");
    assert_eq!(result, Ok(()));
    assert!(attempts > 1, "write completed without ever blocking");
}
