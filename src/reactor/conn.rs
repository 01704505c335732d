use crate::reactor::poller::platform::{sys_close, sys_read};

use std::io;
use std::net::SocketAddr;
use std::os::fd::RawFd;

/// Upper bound on buffered request bytes for one connection.
///
/// A client that fills the buffer without completing its headers is
/// answered with 400 and closed.
pub(crate) const MAX_REQUEST_BYTES: usize = 8192;

/// Lifecycle phase of a connection.
///
/// `Reading` accumulates request bytes; `Writing` covers the synchronous
/// response emission once the header terminator is buffered; `Done` marks
/// the connection eligible for teardown. Teardown happens exactly once,
/// only from `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Reading,
    Writing,
    Done,
}

/// What a round of non-blocking reads produced.
pub(crate) enum ReadOutcome {
    /// The buffer holds a complete header terminator; the request can be
    /// handled.
    RequestReady,
    /// The buffer filled up without a terminator.
    TooLarge,
    /// The socket would block; wait for the next readiness notification.
    NeedMore,
    /// The peer closed the connection, or the read failed.
    Closed,
}

/// One accepted client socket and its buffered input.
///
/// A `Connection` exclusively owns its descriptor; the socket is closed
/// exactly once, when the connection is dropped at teardown. All mutation
/// happens on the single reactor thread.
pub(crate) struct Connection {
    /// Client socket descriptor (non-blocking).
    fd: RawFd,

    /// Peer address, kept for logging.
    peer: SocketAddr,

    /// Bytes read so far for the single request, bounded by
    /// [`MAX_REQUEST_BYTES`].
    buffer: Vec<u8>,

    /// Current lifecycle phase.
    phase: Phase,
}

impl Connection {
    pub(crate) fn new(fd: RawFd, peer: SocketAddr) -> Self {
        Self {
            fd,
            peer,
            buffer: Vec::with_capacity(1024),
            phase: Phase::Reading,
        }
    }

    pub(crate) fn fd(&self) -> RawFd {
        self.fd
    }

    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub(crate) fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Drains the socket until it would block, scanning for the header
    /// terminator after every chunk.
    ///
    /// Connections are registered edge-triggered, so reading must continue
    /// until `EAGAIN`; stopping early would stall the connection until the
    /// peer sends more bytes.
    pub(crate) fn read_ready(&mut self) -> ReadOutcome {
        let mut chunk = [0u8; 1024];

        loop {
            let space = MAX_REQUEST_BYTES - self.buffer.len();
            if space == 0 {
                return ReadOutcome::TooLarge;
            }

            let want = space.min(chunk.len());
            let n = sys_read(self.fd, &mut chunk[..want]);

            match n {
                1.. => {
                    self.buffer.extend_from_slice(&chunk[..n as usize]);

                    if has_header_terminator(&self.buffer) {
                        return ReadOutcome::RequestReady;
                    }
                }
                0 => {
                    return ReadOutcome::Closed;
                }
                _ => {
                    let err = io::Error::last_os_error();

                    return match err.kind() {
                        io::ErrorKind::WouldBlock => ReadOutcome::NeedMore,
                        io::ErrorKind::Interrupted => continue,
                        _ => ReadOutcome::Closed,
                    };
                }
            }
        }
    }
}

impl Drop for Connection {
    /// Closes the client socket.
    fn drop(&mut self) {
        sys_close(self.fd);
    }
}

/// True once the buffered bytes contain the end-of-headers marker.
pub(crate) fn has_header_terminator(buffer: &[u8]) -> bool {
    buffer.windows(4).any(|w| w == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminator_detection() {
        assert!(has_header_terminator(b"GET / HTTP/1.1\r\n\r\n"));
        assert!(has_header_terminator(b"GET / HTTP/1.1\r\nHost: x\r\n\r\ntrailing"));

        assert!(!has_header_terminator(b""));
        assert!(!has_header_terminator(b"GET / HTTP/1.1\r\n"));
        assert!(!has_header_terminator(b"\r\n\r"));
        assert!(!has_header_terminator(b"\n\n"));
    }
}
