//! Use Cases Layer: Transport
//!
//! Provides the two data paths of the transport adapter and the contract the
//! protocol engine is plugged in through:
//! - Receive pump (non-blocking drain, partial-frame reassembly)
//! - Send channel (blocking delivery with an overall timeout)
//! - Protocol engine and connection handler traits
//!
//! Both paths are written against `entities_transport::ByteStream`, so they
//! are independent of the socket implementation.
//! Depends on Entities layer.

pub mod engine;
pub mod receive_pump;
pub mod send_channel;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{ConnectionHandler, ProtocolEngine};
pub use receive_pump::ReceivePump;
pub use send_channel::SendChannel;
pub use session::SessionState;
