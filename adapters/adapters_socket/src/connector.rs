//! Connector Module
//!
//! Establishes the adapter's single stream connection. Candidates produced by
//! the resolver are attempted in order and the first one that accepts the
//! connection wins.
//!
//! Failure policy:
//! - no candidates: `Resolve` error
//! - a candidate's socket cannot be created: `SocketCreate` error for the
//!   whole operation, later candidates are not tried
//! - every attempt refused: `Connect` error with the last OS code
//!
//! Every socket created for a failed attempt is closed before the next
//! attempt or before the error is returned.

use crate::resolver::{AddressResolver, Resolve};
use crate::socket::Socket;
use entities_transport::{os_code, TransportError, TransportResult};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Candidate-by-candidate connector
#[derive(Debug, Clone)]
pub struct Connector<R = AddressResolver> {
    resolver: R,
    connect_timeout: Option<Duration>,
}

impl Connector<AddressResolver> {
    /// Connector backed by the system resolver
    pub fn new() -> Self {
        Self::with_resolver(AddressResolver::new())
    }
}

impl Default for Connector<AddressResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resolve> Connector<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            connect_timeout: None,
        }
    }

    /// Bound each connection attempt
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resolve `host:port` and connect to the first candidate that accepts
    ///
    /// # Returns
    ///
    /// * `Ok(Socket)` - Connected socket in non-blocking mode
    /// * `Err(TransportError)` - Resolve, SocketCreate or Connect error
    pub fn connect(&self, host: &str, port: &str) -> TransportResult<Socket> {
        let candidates = self.resolver.resolve(host, port)?;
        if candidates.is_empty() {
            warn!(host, port, "resolution produced no candidates");
            return Err(TransportError::resolve(0));
        }

        let mut last_code = 0;
        for candidate in &candidates {
            let socket = Socket::for_candidate(candidate).map_err(|e| {
                warn!(addr = %candidate.addr, error = %e, "failed to create socket");
                TransportError::socket_create(&e)
            })?;

            let attempt = socket
                .connect(&candidate.addr, self.connect_timeout)
                .and_then(|()| socket.set_nonblocking(true));

            match attempt {
                Ok(()) => {
                    info!(addr = %candidate.addr, "connected");
                    return Ok(socket);
                }
                Err(e) => {
                    last_code = os_code(&e);
                    debug!(addr = %candidate.addr, error = %e, "connection attempt failed");
                    // `socket` is closed here, before the next attempt
                }
            }
        }

        warn!(host, port, code = last_code, "all connection attempts failed");
        Err(TransportError::connect(last_code))
    }
}
