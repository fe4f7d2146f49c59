//! Address Resolver Module
//!
//! Turns a host/port pair into an ordered list of connection candidates using
//! `getaddrinfo`. Resolution is dual-stack: the resolver's ordering is taken
//! as authoritative and may mix IPv4 and IPv6 candidates.

use crate::socket::AddressFamily;
use entities_transport::{TransportError, TransportResult};
use socket2::{Domain, Protocol, Type};
use std::ffi::{CStr, CString};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::ptr;
use tracing::debug;

/// One resolved, attemptable endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Address family to create the socket with
    pub domain: Domain,
    /// Socket type to create the socket with
    pub socket_type: Type,
    /// Protocol to create the socket with
    pub protocol: Option<Protocol>,
    /// Address to connect to
    pub addr: SocketAddr,
}

impl Candidate {
    /// TCP stream candidate for an address
    pub fn tcp(addr: SocketAddr) -> Self {
        Self {
            domain: Domain::from(AddressFamily::of(&addr)),
            socket_type: Type::STREAM,
            protocol: Some(Protocol::TCP),
            addr,
        }
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.addr)
    }
}

/// Name resolution seam used by the connector
#[cfg_attr(test, mockall::automock)]
pub trait Resolve {
    /// Resolve `host` and `port` into candidates, in preference order
    fn resolve(&self, host: &str, port: &str) -> TransportResult<Vec<Candidate>>;
}

/// `getaddrinfo`-backed resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressResolver;

impl AddressResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for AddressResolver {
    fn resolve(&self, host: &str, port: &str) -> TransportResult<Vec<Candidate>> {
        let c_host = CString::new(host).map_err(|_| TransportError::resolve(libc::EAI_NONAME))?;
        let c_port = CString::new(port).map_err(|_| TransportError::resolve(libc::EAI_SERVICE))?;

        let list = AddrInfoList::lookup(&c_host, &c_port)?;
        let candidates: Vec<Candidate> = list.iter().filter_map(candidate_from).collect();

        debug!(host, port, count = candidates.len(), "resolved address candidates");
        Ok(candidates)
    }
}

/// Owned `addrinfo` list, freed on drop
struct AddrInfoList {
    head: *mut libc::addrinfo,
}

impl AddrInfoList {
    fn lookup(host: &CStr, port: &CStr) -> TransportResult<Self> {
        // SAFETY: an all-zero addrinfo is the documented way to build hints.
        let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
        hints.ai_family = libc::AF_UNSPEC;
        hints.ai_socktype = libc::SOCK_STREAM;
        hints.ai_protocol = libc::IPPROTO_TCP;

        let mut head: *mut libc::addrinfo = ptr::null_mut();
        // SAFETY: host and port are NUL-terminated, hints is initialised and
        // head receives a list we take ownership of.
        let rc = unsafe { libc::getaddrinfo(host.as_ptr(), port.as_ptr(), &hints, &mut head) };

        let list = Self { head };
        if rc != 0 {
            let code = if rc == libc::EAI_SYSTEM {
                io::Error::last_os_error().raw_os_error().unwrap_or(rc)
            } else {
                rc
            };
            debug!(host = ?host, code, reason = %gai_message(rc), "address resolution failed");
            return Err(TransportError::resolve(code));
        }
        Ok(list)
    }

    fn iter(&self) -> AddrInfoIter<'_> {
        AddrInfoIter {
            next: self.head,
            _list: self,
        }
    }
}

impl Drop for AddrInfoList {
    fn drop(&mut self) {
        if !self.head.is_null() {
            // SAFETY: head came from a successful getaddrinfo and is freed once.
            unsafe { libc::freeaddrinfo(self.head) };
        }
    }
}

struct AddrInfoIter<'a> {
    next: *mut libc::addrinfo,
    _list: &'a AddrInfoList,
}

impl<'a> Iterator for AddrInfoIter<'a> {
    type Item = &'a libc::addrinfo;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() {
            return None;
        }
        // SAFETY: every node is owned by the list borrowed for 'a.
        let node = unsafe { &*self.next };
        self.next = node.ai_next;
        Some(node)
    }
}

fn candidate_from(info: &libc::addrinfo) -> Option<Candidate> {
    let addr = socket_addr_from(info)?;
    Some(Candidate {
        domain: Domain::from(info.ai_family),
        socket_type: Type::from(info.ai_socktype),
        protocol: Some(Protocol::from(info.ai_protocol)),
        addr,
    })
}

fn socket_addr_from(info: &libc::addrinfo) -> Option<SocketAddr> {
    if info.ai_addr.is_null() {
        return None;
    }
    match info.ai_family {
        libc::AF_INET => {
            // SAFETY: AF_INET entries carry a sockaddr_in.
            let sin = unsafe { &*(info.ai_addr as *const libc::sockaddr_in) };
            let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
            Some(SocketAddr::V4(SocketAddrV4::new(ip, u16::from_be(sin.sin_port))))
        }
        libc::AF_INET6 => {
            // SAFETY: AF_INET6 entries carry a sockaddr_in6.
            let sin6 = unsafe { &*(info.ai_addr as *const libc::sockaddr_in6) };
            Some(SocketAddr::V6(SocketAddrV6::new(
                Ipv6Addr::from(sin6.sin6_addr.s6_addr),
                u16::from_be(sin6.sin6_port),
                sin6.sin6_flowinfo,
                sin6.sin6_scope_id,
            )))
        }
        _ => None,
    }
}

fn gai_message(code: libc::c_int) -> String {
    // SAFETY: gai_strerror returns a pointer to a static string.
    unsafe { CStr::from_ptr(libc::gai_strerror(code)) }
        .to_string_lossy()
        .into_owned()
}
