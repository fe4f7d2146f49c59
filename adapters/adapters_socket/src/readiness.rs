//! Readiness Module
//!
//! Waits for a single file descriptor to become readable or writable using
//! `poll(2)`. A zero timeout polls without blocking.
//!
//! Hang-up and error conditions are reported as ready so that the following
//! read or write surfaces the actual condition to the caller.

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags};
use std::io;
use std::os::fd::AsFd;
use std::time::{Duration, Instant};

/// Readiness the caller is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    /// Data (or end of stream) available for reading
    Readable,
    /// Send buffer space available
    Writable,
}

impl Interest {
    fn flags(self) -> PollFlags {
        match self {
            Interest::Readable => PollFlags::POLLIN,
            Interest::Writable => PollFlags::POLLOUT,
        }
    }
}

/// Wait up to `timeout` for `fd` to become ready for `interest`
///
/// An interrupted wait is resumed with the time remaining.
///
/// # Returns
///
/// * `Ok(true)` - The descriptor is ready (or in an error/hang-up state)
/// * `Ok(false)` - The timeout elapsed first
/// * `Err(io::Error)` - `poll` failed or the descriptor is invalid
pub fn wait_for<Fd: AsFd>(fd: &Fd, interest: Interest, timeout: Duration) -> io::Result<bool> {
    let deadline = Instant::now().checked_add(timeout);

    loop {
        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => timeout,
        };

        let mut fds = [PollFd::new(fd, interest.flags())];
        match poll(&mut fds, timeout_millis(remaining)) {
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(errno.into()),
            Ok(0) => return Ok(false),
            Ok(_) => {}
        }

        let revents = fds[0].revents().unwrap_or_else(PollFlags::empty);
        if revents.contains(PollFlags::POLLNVAL) {
            return Err(Errno::EBADF.into());
        }
        return Ok(revents.intersects(interest.flags() | PollFlags::POLLERR | PollFlags::POLLHUP));
    }
}

/// Convert a timeout to whole milliseconds for `poll`, rounding up so a
/// non-zero wait never degrades into a busy poll.
fn timeout_millis(timeout: Duration) -> libc::c_int {
    let mut millis = timeout.as_millis();
    if timeout.subsec_nanos() % 1_000_000 != 0 {
        millis += 1;
    }
    millis.min(libc::c_int::MAX as u128) as libc::c_int
}
