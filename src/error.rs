use std::error;
use std::fmt;
use std::io;

/// Structural errors produced by the raw access layer itself.
///
/// A `RawError` is only ever added *around* a caller-supplied operation:
/// whatever the operation records through its own captured state is never
/// inspected, wrapped, or altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawError {
    /// The owning socket's close sequence has begun or finished.
    ///
    /// Terminal for the call; retrying yields the same error.
    Closed,

    /// The operation has no meaning for this class of handle.
    ///
    /// Returned by [`read`](crate::RawSock::read) and
    /// [`write`](crate::RawSock::write) on listener-class handles, which
    /// carry no data-transfer semantics.
    NotSupported,
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawError::Closed => write!(f, "use of closed network connection"),
            RawError::NotSupported => write!(f, "raw read/write not supported for this handle"),
        }
    }
}

impl error::Error for RawError {}

impl From<RawError> for io::Error {
    fn from(err: RawError) -> io::Error {
        let kind = match err {
            RawError::Closed => io::ErrorKind::NotConnected,
            RawError::NotSupported => io::ErrorKind::Unsupported,
        };

        io::Error::new(kind, err)
    }
}
