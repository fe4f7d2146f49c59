//! API Facades Layer
//!
//! Provides [`TransportAdapter`], the assembled stream transport: it resolves
//! and connects on construction, pumps inbound bytes into a protocol engine,
//! delivers the engine's outbound bytes and releases everything it acquired
//! when dropped.
//!
//! All facades call underlying Rust modules from inner layers.

pub mod transport_facade;

pub use transport_facade::TransportAdapter;

// Re-export the types callers need to drive the adapter
pub use entities_transport::{Phase, TransportConfig, TransportError, TransportErrorKind, TransportResult};
pub use usecases_transport::{ConnectionHandler, ProtocolEngine, SessionState};
