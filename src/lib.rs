//! # mini-webserver
//!
//! **mini-webserver** is a single-process, single-threaded HTTP/1.1 static
//! file server built on a readiness-based event loop.
//!
//! Unlike general-purpose servers, it multiplexes all client sockets over one
//! thread using `epoll`: the reactor blocks until at least one registered
//! descriptor is ready, accepts new connections from the listening socket,
//! and drives each existing connection through a small read → respond → close
//! state machine. File contents are copied from disk to the socket with
//! `sendfile`, never staged in user-space memory.
//!
//! Every connection serves exactly one request and is then closed
//! (`Connection: close` is always sent; keep-alive is never honored).
//!
//! ## Quick Start
//!
//! ```bash
//! serve 8080 public
//! ```
//!
//! Then request a file:
//!
//! ```bash
//! curl http://127.0.0.1:8080/index.html
//! ```
//!
//! ## Modules
//!
//! - [`reactor`] — The event loop, connection state machine, and poller
//! - [`net`] — Non-blocking TCP listener
//! - [`http`] — Request parsing, response formatting, MIME lookup
//! - [`fs`] — Document-root path resolution and file handles
//! - [`config`] — Command-line configuration

pub mod config;
pub mod fs;
pub mod http;
pub mod net;
pub mod reactor;

mod utils;
