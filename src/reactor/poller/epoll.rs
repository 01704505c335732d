//! Linux `epoll`-based poller.
//!
//! This module wraps the `epoll` facility behind the small interface the
//! reactor needs:
//! - register file descriptors with read/write interests, optionally
//!   edge-triggered,
//! - block waiting for I/O readiness,
//! - translate kernel events into reactor [`Event`]s.
//!
//! Error and hang-up conditions (`EPOLLERR` / `EPOLLHUP`) are reported
//! separately from readability so the reactor can force connection
//! teardown regardless of buffered progress.

use super::Interest;
use crate::reactor::event::Event;

use libc::{
    EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLLERR, EPOLLET, EPOLLHUP, EPOLLIN, EPOLLOUT,
    epoll_create1, epoll_ctl, epoll_event, epoll_wait,
};
use std::io;
use std::os::unix::io::RawFd;

use super::platform::sys_close;

/// Linux `epoll` poller.
///
/// Owns the `epoll` instance and a reusable kernel-event buffer. The
/// instance lives for the whole reactor lifetime and is closed on drop.
pub(crate) struct EpollPoller {
    /// Epoll file descriptor.
    epoll: RawFd,

    /// Reusable buffer for kernel epoll events.
    events: Vec<epoll_event>,
}

impl EpollPoller {
    /// Creates a new `EpollPoller`.
    ///
    /// Failure to create the epoll instance is a fatal startup error and
    /// is propagated to the caller.
    pub(crate) fn new() -> io::Result<Self> {
        let epoll = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if epoll < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            epoll,
            events: Vec::with_capacity(64),
        })
    }

    /// Registers a file descriptor with the poller.
    pub(crate) fn register(&self, fd: RawFd, token: usize, interest: Interest) -> io::Result<()> {
        let mut flags = 0;

        if interest.read {
            flags |= EPOLLIN;
        }
        if interest.write {
            flags |= EPOLLOUT;
        }
        if interest.edge {
            flags |= EPOLLET;
        }

        let mut event = epoll_event {
            events: flags as u32,
            u64: token as u64,
        };

        let rc = unsafe { epoll_ctl(self.epoll, EPOLL_CTL_ADD, fd, &mut event) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// Removes a file descriptor from the poller.
    ///
    /// Called exactly once per connection at teardown, before the
    /// descriptor is closed.
    pub(crate) fn deregister(&self, fd: RawFd) {
        unsafe {
            epoll_ctl(self.epoll, EPOLL_CTL_DEL, fd, std::ptr::null_mut());
        }
    }

    /// Polls for I/O readiness events.
    ///
    /// Blocks until at least one registered file descriptor is ready.
    /// Events for the same token within one wake-up are merged.
    pub(crate) fn poll(&mut self, events: &mut Vec<Event>) -> io::Result<()> {
        unsafe {
            self.events.set_len(self.events.capacity());
        }

        let n = unsafe {
            epoll_wait(
                self.epoll,
                self.events.as_mut_ptr(),
                self.events.capacity() as i32,
                -1,
            )
        };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                unsafe {
                    self.events.set_len(0);
                }
                return Ok(());
            }
            return Err(err);
        }

        unsafe {
            self.events.set_len(n as usize);
        }

        events.clear();

        for ev in &self.events {
            let token = ev.u64 as usize;

            let readable = ev.events & (EPOLLIN as u32) != 0;
            let writable = ev.events & (EPOLLOUT as u32) != 0;
            let hangup = ev.events & ((EPOLLERR | EPOLLHUP) as u32) != 0;

            if let Some(e) = events.iter_mut().find(|e| e.token == token) {
                e.readable |= readable;
                e.writable |= writable;
                e.hangup |= hangup;
            } else {
                events.push(Event {
                    token,
                    readable,
                    writable,
                    hangup,
                });
            }
        }

        Ok(())
    }
}

impl Drop for EpollPoller {
    /// Closes the epoll instance.
    fn drop(&mut self) {
        sys_close(self.epoll);
    }
}
