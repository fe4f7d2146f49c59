//! Session State Module

use std::fmt;

/// Lifecycle of a transport session as reported by the protocol engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Socket connected; engine handshake not yet reported
    Connecting,
    /// Engine reported the session ready
    Connected,
    /// A transport or engine error ended the session
    Failed,
    /// Engine closed the session
    Closed,
}

impl SessionState {
    /// Whether the session can still carry traffic
    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Connecting | SessionState::Connected)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Connecting => "connecting",
            SessionState::Connected => "connected",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
