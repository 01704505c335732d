use crate::reactor::poller::platform::{
    sys_accept, sys_bind, sys_close, sys_listen, sys_parse_sockaddr, sys_set_reuseaddr,
    sys_socket, sys_sockname,
};

use std::io;
use std::net::SocketAddr;
use std::os::fd::RawFd;

/// A non-blocking TCP listener.
///
/// `TcpListener` owns the server's listening socket. It is created once at
/// startup and handed to the reactor, which registers it for readiness
/// notifications and calls [`accept`](Self::accept) whenever the kernel
/// reports pending connections.
pub struct TcpListener {
    /// File descriptor of the listening socket.
    fd: RawFd,
}

impl TcpListener {
    /// Binds a TCP listener to the given address.
    ///
    /// The address must be a valid socket address string, such as
    /// `"0.0.0.0:8080"` or `"[::1]:8080"`.
    ///
    /// This function:
    /// - creates a non-blocking socket,
    /// - enables `SO_REUSEADDR` so restarts can rebind immediately,
    /// - binds and starts listening.
    pub fn bind(address: &str) -> io::Result<Self> {
        let (storage, len) = sys_parse_sockaddr(address)?;
        let domain = storage.ss_family as i32;

        let fd = sys_socket(domain)?;

        let listener = Self { fd };

        sys_set_reuseaddr(fd)?;
        sys_bind(fd, &storage, len)?;
        sys_listen(fd)?;

        Ok(listener)
    }

    /// Accepts one pending connection, if any.
    ///
    /// Returns `Ok(None)` when no connection is waiting (`EAGAIN`); the
    /// reactor will be notified again the next time the listening socket
    /// becomes ready. The accepted socket is already non-blocking.
    pub fn accept(&self) -> io::Result<Option<(RawFd, SocketAddr)>> {
        match sys_accept(self.fd) {
            Ok(accepted) => Ok(Some(accepted)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns the local socket address of this listener.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        sys_sockname(self.fd)
    }

    /// Raw descriptor, used by the reactor for poller registration.
    pub(crate) fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for TcpListener {
    /// Closes the listening socket.
    fn drop(&mut self) {
        sys_close(self.fd);
    }
}
