//! Socket Module
//!
//! Provides the stream socket owned by a transport adapter. This wraps a
//! `socket2` socket, adds readiness waits on top of it and implements the
//! `ByteStream` contract used by the receive pump and the send channel.

use crate::readiness::{wait_for, Interest};
use crate::resolver::Candidate;
use entities_transport::ByteStream;
use socket2::{Domain, Protocol, SockAddr, Socket as Socket2, Type};
use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr};
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

/// Suppress `SIGPIPE` on writes to a peer that has gone away.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
)))]
const SEND_FLAGS: libc::c_int = 0;

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// IPv4
    Ipv4,
    /// IPv6
    Ipv6,
}

impl AddressFamily {
    /// Family of a socket address
    pub fn of(addr: &SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(_) => AddressFamily::Ipv4,
            SocketAddr::V6(_) => AddressFamily::Ipv6,
        }
    }
}

impl From<AddressFamily> for Domain {
    fn from(family: AddressFamily) -> Self {
        match family {
            AddressFamily::Ipv4 => Domain::IPV4,
            AddressFamily::Ipv6 => Domain::IPV6,
        }
    }
}

/// Stream socket
///
/// Exclusively owned; closed when dropped. The socket is blocking while it
/// connects and is switched to non-blocking mode once connected, after which
/// every read and write is preceded by a readiness wait.
#[derive(Debug)]
pub struct Socket {
    inner: Socket2,
}

impl Socket {
    /// Create a new socket
    ///
    /// # Arguments
    ///
    /// * `domain` - Address family of the socket
    /// * `ty` - Socket type
    /// * `protocol` - Protocol, or `None` for the family default
    ///
    /// # Returns
    ///
    /// * `Ok(Socket)` - Created socket
    /// * `Err(io::Error)` - Error creating socket
    pub fn new(domain: Domain, ty: Type, protocol: Option<Protocol>) -> io::Result<Self> {
        let inner = Socket2::new(domain, ty, protocol)?;

        #[cfg(target_vendor = "apple")]
        inner.set_nosigpipe(true)?;

        Ok(Self { inner })
    }

    /// Create a socket matching a resolved candidate's family, type and protocol
    pub fn for_candidate(candidate: &Candidate) -> io::Result<Self> {
        Self::new(candidate.domain, candidate.socket_type, candidate.protocol)
    }

    /// Connect to a remote address
    ///
    /// # Arguments
    ///
    /// * `addr` - Remote address to connect to
    /// * `timeout` - Upper bound on the attempt; `None` waits for the OS
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Connected
    /// * `Err(io::Error)` - Error connecting
    pub fn connect(&self, addr: &SocketAddr, timeout: Option<Duration>) -> io::Result<()> {
        let sock_addr = SockAddr::from(*addr);
        match timeout {
            Some(timeout) => self.inner.connect_timeout(&sock_addr, timeout),
            None => self.inner.connect(&sock_addr),
        }
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        self.inner.set_nonblocking(nonblocking)
    }

    /// Close the sending half; the peer observes end of stream
    pub fn shutdown_write(&self) -> io::Result<()> {
        self.inner.shutdown(Shutdown::Write)
    }

    /// Get the local address
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr().and_then(into_socket_addr)
    }

    /// Get the peer address
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.inner.peer_addr().and_then(into_socket_addr)
    }

    /// Get the address family of the bound socket
    pub fn family(&self) -> io::Result<AddressFamily> {
        self.local_addr().map(|addr| AddressFamily::of(&addr))
    }
}

fn into_socket_addr(addr: SockAddr) -> io::Result<SocketAddr> {
    addr.as_socket()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid socket address"))
}

impl AsRawFd for Socket {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

impl ByteStream for Socket {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        wait_for(&self.inner, Interest::Readable, timeout)
    }

    fn wait_writable(&mut self, timeout: Duration) -> io::Result<bool> {
        wait_for(&self.inner, Interest::Writable, timeout)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.inner).read(buf)
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.send_with_flags(buf, SEND_FLAGS)
    }
}
