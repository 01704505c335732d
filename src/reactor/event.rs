/// An I/O event reported by the poller.
///
/// An `Event` carries readiness information for one registered file
/// descriptor, identified by its token. The reactor uses the token to find
/// the connection (or the listening socket) the event belongs to.
pub(crate) struct Event {
    /// Token associated with the registered file descriptor.
    pub(crate) token: usize,

    /// The file descriptor is readable.
    pub(crate) readable: bool,

    /// The file descriptor is writable.
    pub(crate) writable: bool,

    /// The kernel reported an error or hang-up condition; the owning
    /// connection must be torn down regardless of buffered progress.
    pub(crate) hangup: bool,
}
