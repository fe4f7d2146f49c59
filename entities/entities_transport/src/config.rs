//! Transport Configuration Module
//!
//! Construction parameters for the transport adapter.

use std::time::Duration;

/// Default broker port used when none is given
pub const DEFAULT_PORT: &str = "5672";

/// Default host used when none is given
pub const DEFAULT_HOST: &str = "localhost";

/// Overall time a single send may wait for the socket to become writable
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Upper bound on a single read
pub const DEFAULT_RECV_CHUNK_SIZE: usize = 16 * 1024;

/// Default readiness wait used by `wait_and_pump`
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// DNS name or IP address of the host
    pub host: String,
    /// Service name or port number
    pub port: String,
    /// Per-candidate connect timeout; `None` blocks until the OS gives up
    pub connect_timeout: Option<Duration>,
    /// Overall writability wait for one send call
    pub send_timeout: Duration,
    /// Maximum bytes taken from the socket per read
    pub recv_chunk_size: usize,
    /// Readiness wait granularity for the event loop
    pub poll_interval: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            connect_timeout: None,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            recv_chunk_size: DEFAULT_RECV_CHUNK_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TransportConfig {
    /// Create a configuration for the given host and port with default timings
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Set the read cap; zero is raised to one byte
    pub fn with_recv_chunk_size(mut self, size: usize) -> Self {
        self.recv_chunk_size = size.max(1);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
