//! Platform-specific I/O poller abstraction.
//!
//! The poller is the readiness-notification facility behind the reactor:
//! it registers file descriptors with the kernel, blocks until at least one
//! of them is ready, and reports readiness as [`Event`](crate::reactor::event::Event)
//! records.
//!
//! Only Linux (`epoll`) is supported; `epoll` and `sendfile` are the
//! readiness and bulk-transfer primitives this server is built around.

#[cfg(target_os = "linux")]
mod epoll;

#[cfg(target_os = "linux")]
pub(crate) type Poller = epoll::EpollPoller;

#[cfg(not(target_os = "linux"))]
compile_error!("mini-webserver requires Linux (epoll and sendfile)");

pub(crate) mod unix;

pub(crate) use unix as platform;

/// Readiness interest registered for a file descriptor.
#[derive(Clone, Copy)]
pub(crate) struct Interest {
    /// Report when the descriptor becomes readable.
    pub(crate) read: bool,

    /// Report when the descriptor becomes writable.
    pub(crate) write: bool,

    /// Use edge-triggered delivery: each transition to "ready" is reported
    /// once, so the owner must drain the descriptor before waiting again.
    pub(crate) edge: bool,
}

impl Interest {
    /// Level-triggered read interest, used for the listening socket.
    pub(crate) const LISTENER: Interest = Interest {
        read: true,
        write: false,
        edge: false,
    };

    /// Edge-triggered read interest, used for client connections.
    pub(crate) const CONNECTION: Interest = Interest {
        read: true,
        write: false,
        edge: true,
    };
}
