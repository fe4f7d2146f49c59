//! Byte Stream Module
//!
//! The minimal socket contract the receive pump and send channel are written
//! against. The socket adapter implements it over a real OS socket; tests
//! implement it with scripted fakes.

use std::io;
use std::time::Duration;

/// Connected bidirectional byte stream with readiness polling
pub trait ByteStream {
    /// Wait up to `timeout` for the stream to become readable
    ///
    /// A zero timeout polls without blocking. Returns `Ok(false)` when the
    /// timeout elapsed without readiness.
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Wait up to `timeout` for the stream to become writable
    fn wait_writable(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Single read into `buf`; `Ok(0)` means the peer sent no bytes
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Single write of (a prefix of) `buf`
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).wait_readable(timeout)
    }

    fn wait_writable(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).wait_writable(timeout)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).recv(buf)
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).send(buf)
    }
}
