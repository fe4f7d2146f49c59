//! Transport Error Module
//!
//! Provides the error taxonomy shared by every layer of the transport adapter.
//! Each error keeps the operating-system error code and the phase in which it
//! originated as separate fields, so callers can match on them without parsing
//! a formatted message.

use std::fmt;
use std::io;
use thiserror::Error;

/// `ETIMEDOUT`, reported with send timeouts
#[cfg(unix)]
pub const TIMED_OUT_CODE: i32 = libc::ETIMEDOUT;

/// `WSAETIMEDOUT`
#[cfg(windows)]
pub const TIMED_OUT_CODE: i32 = 10060;

/// Stage of the transport lifecycle in which an error originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Address resolution
    Resolve,
    /// Socket creation
    Create,
    /// Connection establishment
    Connect,
    /// Outbound transmission
    Send,
    /// Inbound reception
    Receive,
    /// Waiting for writability
    Timeout,
    /// Failure reported by the protocol engine
    Protocol,
}

impl Phase {
    /// Short phase tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Resolve => "resolve",
            Phase::Create => "create",
            Phase::Connect => "connect",
            Phase::Send => "send",
            Phase::Receive => "receive",
            Phase::Timeout => "timeout",
            Phase::Protocol => "protocol",
        }
    }

    /// Human-readable description used in diagnostics
    pub fn description(&self) -> &'static str {
        match self {
            Phase::Resolve => "Unable to resolve hostname",
            Phase::Create => "Failed to create socket",
            Phase::Connect => "Failed to connect",
            Phase::Send => "failed to send data",
            Phase::Receive => "failed to read data",
            Phase::Timeout => "failed to write data",
            Phase::Protocol => "protocol engine error",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Host could not be resolved or yielded no candidates
    Resolve,
    /// A socket could not be created for a candidate
    SocketCreate,
    /// No candidate accepted the connection
    Connect,
    /// The socket did not become writable in time
    SendTimeout,
    /// A write failed
    Send,
    /// A read failed
    Receive,
    /// The protocol engine reported a fatal error
    Protocol,
}

impl TransportErrorKind {
    /// Phase in which errors of this kind originate
    pub fn phase(&self) -> Phase {
        match self {
            TransportErrorKind::Resolve => Phase::Resolve,
            TransportErrorKind::SocketCreate => Phase::Create,
            TransportErrorKind::Connect => Phase::Connect,
            TransportErrorKind::SendTimeout => Phase::Timeout,
            TransportErrorKind::Send => Phase::Send,
            TransportErrorKind::Receive => Phase::Receive,
            TransportErrorKind::Protocol => Phase::Protocol,
        }
    }
}

/// Transport error
///
/// Carries the error kind, the underlying OS-level code (0 when the failure
/// did not come from the operating system) and the phase tag. Protocol
/// errors additionally carry the engine's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: 0x{code:x}{}", .phase.description(), MessageSuffix(.message))]
pub struct TransportError {
    kind: TransportErrorKind,
    code: i32,
    phase: Phase,
    message: Option<String>,
}

impl TransportError {
    /// Create an error of the given kind with an OS-level code
    pub fn new(kind: TransportErrorKind, code: i32) -> Self {
        Self {
            kind,
            code,
            phase: kind.phase(),
            message: None,
        }
    }

    /// Create an error from an I/O error, keeping its raw OS code
    pub fn from_io(kind: TransportErrorKind, err: &io::Error) -> Self {
        Self::new(kind, os_code(err))
    }

    pub fn resolve(code: i32) -> Self {
        Self::new(TransportErrorKind::Resolve, code)
    }

    pub fn socket_create(err: &io::Error) -> Self {
        Self::from_io(TransportErrorKind::SocketCreate, err)
    }

    pub fn connect(code: i32) -> Self {
        Self::new(TransportErrorKind::Connect, code)
    }

    pub fn send_timeout() -> Self {
        Self::new(TransportErrorKind::SendTimeout, TIMED_OUT_CODE)
    }

    pub fn send(err: &io::Error) -> Self {
        Self::from_io(TransportErrorKind::Send, err)
    }

    pub fn receive(err: &io::Error) -> Self {
        Self::from_io(TransportErrorKind::Receive, err)
    }

    /// Error reported by the protocol engine through its error notification
    pub fn protocol(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Protocol,
            code: 0,
            phase: Phase::Protocol,
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// OS-level error code
    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Engine message, for protocol errors
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

struct MessageSuffix<'a>(&'a Option<String>);

impl fmt::Display for MessageSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(message) => write!(f, " ({message})"),
            None => Ok(()),
        }
    }
}

/// Raw OS code of an I/O error
///
/// Timeouts synthesised by the standard library or `socket2` carry no raw
/// code and map to [`TIMED_OUT_CODE`]. Any other error that did not come from
/// the OS maps to 0.
pub fn os_code(err: &io::Error) -> i32 {
    match err.raw_os_error() {
        Some(code) => code,
        None if err.kind() == io::ErrorKind::TimedOut => TIMED_OUT_CODE,
        None => 0,
    }
}

/// Result alias used across the transport crates
pub type TransportResult<T> = Result<T, TransportError>;
