//! Adapters Layer: Stream Socket
//!
//! Provides the operating-system side of the transport adapter: stream sockets,
//! readiness polling, address resolution and connection establishment. Sockets
//! are created and driven through the `socket2` crate; readiness waits and
//! name resolution go straight to `libc`.
//!
//! ## Overview
//!
//! The `adapters_socket` crate provides:
//! - **Resolution**: host/port to an ordered, dual-stack candidate list
//! - **Connection**: first-success connection over the candidate list
//! - **Socket**: an exclusively owned stream socket implementing `ByteStream`
//! - **Readiness**: bounded `poll(2)` waits for readability and writability
//!
//! ## Architecture
//!
//! This crate is part of the adapters layer. It depends on
//! `entities_transport` for the error taxonomy and the `ByteStream` contract.
//!
//! ## See Also
//!
//! - [`usecases_transport`](../usecases_transport/index.html): receive pump and send channel

pub mod connector;
pub mod readiness;
pub mod resolver;
pub mod socket;

pub use connector::Connector;
pub use readiness::{wait_for, Interest};
pub use resolver::{AddressResolver, Candidate, Resolve};
pub use socket::{AddressFamily, Socket};
