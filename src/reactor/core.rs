use crate::fs;
use crate::http::error::RequestError;
use crate::http::{mime, request, response};
use crate::net::TcpListener;
use crate::reactor::conn::{Connection, Phase, ReadOutcome};
use crate::reactor::event::Event;
use crate::reactor::poller::{Interest, Poller};
use crate::utils::Slab;

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reserved token for the listening socket.
///
/// Slab indices grow from zero, so `usize::MAX` never collides with a
/// connection token.
const LISTENER_TOKEN: usize = usize::MAX;

/// The event loop.
///
/// A `Reactor` owns the listening socket, the poller, and the registry of
/// live connections (a slab whose indices double as poller tokens). One
/// thread drives everything: the only blocking point between iterations is
/// the poll call, and all socket I/O within an iteration is non-blocking
/// except the synchronous response writes.
pub struct Reactor {
    /// Listening socket, registered level-triggered.
    listener: TcpListener,

    /// Readiness-notification backend.
    poller: Poller,

    /// Reusable buffer of readiness events.
    events: Vec<Event>,

    /// Registry of live connections; slab index = poller token.
    connections: Slab<Connection>,

    /// Document root shared read-only by all connections.
    root: PathBuf,
}

impl Reactor {
    /// Binds the listening socket and sets up the poller.
    ///
    /// Any failure here (socket, bind, listen, poller creation,
    /// registration) is fatal to the process and propagates to `main`.
    pub fn bind(address: &str, root: &Path) -> io::Result<Self> {
        let listener = TcpListener::bind(address)?;
        let poller = Poller::new()?;

        poller.register(listener.as_raw_fd(), LISTENER_TOKEN, Interest::LISTENER)?;

        Ok(Self {
            listener,
            poller,
            events: Vec::with_capacity(64),
            connections: Slab::with_capacity(64),
            root: root.to_path_buf(),
        })
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the event loop until a fatal poller error.
    ///
    /// Each iteration blocks until at least one registered descriptor is
    /// ready, then services the reported events in order.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.poller.poll(&mut self.events)?;

            let batch: Vec<Event> = self.events.drain(..).collect();
            for event in batch {
                if event.token == LISTENER_TOKEN {
                    self.accept_ready();
                } else {
                    self.connection_ready(event);
                }
            }
        }
    }

    /// Accepts one pending connection.
    ///
    /// The listening socket is level-triggered, so any remaining backlog is
    /// reported again on the next poll; accepting one per notification is
    /// enough. The new connection is registered edge-triggered for input.
    fn accept_ready(&mut self) {
        match self.listener.accept() {
            Ok(Some((fd, peer))) => {
                let token = self.connections.insert(Connection::new(fd, peer));

                if let Err(e) = self.poller.register(fd, token, Interest::CONNECTION) {
                    warn!("failed to register {peer}: {e}");
                    self.connections.remove(token);
                    return;
                }

                debug!("accepted {peer} ({} live)", self.connections.len());
            }
            Ok(None) => {}
            Err(e) => warn!("accept failed: {e}"),
        }
    }

    /// Drives one connection through its state machine.
    ///
    /// Readable data is consumed first, so a request that arrived together
    /// with a hang-up is still answered; the hang-up then forces teardown.
    fn connection_ready(&mut self, event: Event) {
        // A vacant slot means the connection was already torn down.
        let Some(conn) = self.connections.get_mut(event.token) else {
            return;
        };

        if event.readable && conn.phase() == Phase::Reading {
            match conn.read_ready() {
                ReadOutcome::RequestReady => {
                    conn.set_phase(Phase::Writing);
                    Self::serve(conn, &self.root);
                    conn.set_phase(Phase::Done);
                }
                ReadOutcome::TooLarge => {
                    if let Err(e) = response::send_error(conn.fd(), RequestError::BadRequest) {
                        debug!("error response to {} failed: {e}", conn.peer());
                    }
                    conn.set_phase(Phase::Done);
                }
                ReadOutcome::NeedMore => {}
                ReadOutcome::Closed => {
                    conn.set_phase(Phase::Done);
                }
            }
        }

        if event.hangup {
            conn.set_phase(Phase::Done);
        }

        if conn.phase() == Phase::Done {
            self.teardown(event.token);
        }
    }

    /// Handles the buffered request and writes the entire response.
    ///
    /// Runs synchronously start to finish: parse, filter the method,
    /// resolve the target, then stream the file or a canned error body.
    fn serve(conn: &Connection, root: &Path) {
        let fd = conn.fd();

        let result = match request::parse(conn.buffer()) {
            Err(e) => {
                debug!("{}: malformed request ({e:?})", conn.peer());
                response::send_error(fd, RequestError::BadRequest)
            }

            Ok(req) if req.method != "GET" => {
                debug!("{}: {} {} -> 405", conn.peer(), req.method, req.target);
                response::send_error(fd, RequestError::MethodNotAllowed)
            }

            Ok(req) => match fs::resolve::open(root, req.target) {
                Ok(served) => {
                    let content_type = mime::content_type(&served.path);
                    debug!(
                        "{}: GET {} -> 200 ({} bytes, {content_type})",
                        conn.peer(),
                        req.target,
                        served.file.size(),
                    );
                    response::send_file(fd, &served.file, content_type)
                }
                Err(e) => {
                    debug!(
                        "{}: GET {} -> {}",
                        conn.peer(),
                        req.target,
                        e.status().as_u16(),
                    );
                    response::send_error(fd, e)
                }
            },
        };

        if let Err(e) = result {
            debug!("response to {} failed: {e}", conn.peer());
        }
    }

    /// Deregisters and releases a connection.
    ///
    /// Dropping the connection closes its socket; the vacated slab slot
    /// makes any late event for this token a no-op.
    fn teardown(&mut self, token: usize) {
        if let Some(conn) = self.connections.remove(token) {
            self.poller.deregister(conn.fd());
            debug!("closed {} ({} live)", conn.peer(), self.connections.len());
        }
    }
}
