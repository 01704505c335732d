use crate::reactor::poller::platform::{sys_close, sys_open_read};

use std::ffi::CStr;
use std::io;
use std::os::fd::RawFd;

/// An open, read-only file handle.
///
/// `File` exclusively owns its descriptor and closes it exactly once on
/// drop. The size is captured at resolution time and drives the
/// `Content-Length` header and the transfer loop.
#[derive(Debug)]
pub struct File {
    /// File descriptor of the opened file.
    fd: RawFd,

    /// Byte size reported by `stat` at resolution time.
    size: u64,
}

impl File {
    /// Opens a file in read-only mode.
    pub(crate) fn open_read(path: &CStr, size: u64) -> io::Result<Self> {
        let fd = sys_open_read(path)?;

        Ok(Self { fd, size })
    }

    /// Byte size of the file.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Raw descriptor, used as the `sendfile` source.
    pub(crate) fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for File {
    /// Closes the file descriptor.
    fn drop(&mut self) {
        sys_close(self.fd);
    }
}
