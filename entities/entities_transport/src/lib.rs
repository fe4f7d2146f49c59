//! Entities Layer: Transport
//!
//! Provides the fundamental types of the stream transport adapter: the error
//! taxonomy, the receive buffer, construction parameters and the byte stream
//! contract the upper layers are written against.
//!
//! ## Overview
//!
//! The `entities_transport` crate is the innermost layer of the transport
//! workspace. It has no knowledge of sockets or protocol engines; it only
//! describes the values that flow between them.
//!
//! ## Modules
//!
//! - **[`error`](error/index.html)**: `TransportError` with kind, OS code and phase
//! - **[`buffer`](buffer/index.html)**: `ReceiveBuffer` holding unconsumed bytes
//! - **[`config`](config/index.html)**: `TransportConfig` with defaults
//! - **[`stream`](stream/index.html)**: the `ByteStream` trait
//!
//! ## See Also
//!
//! - [`adapters_socket`](../adapters_socket/index.html): OS socket implementation
//! - [`usecases_transport`](../usecases_transport/index.html): receive pump and send channel

pub mod buffer;
pub mod config;
pub mod error;
pub mod stream;

pub use buffer::ReceiveBuffer;
pub use config::TransportConfig;
pub use error::{os_code, Phase, TransportError, TransportErrorKind, TransportResult};
pub use stream::ByteStream;
