//! Protocol Engine Contract
//!
//! The transport treats the protocol engine as a black box. Bytes flow in
//! through [`ProtocolEngine::parse`]; bytes flow out, and lifecycle
//! notifications flow back, through the [`ConnectionHandler`] the transport
//! hands to the engine.

use entities_transport::TransportResult;

/// Transport-side callbacks available to a protocol engine
pub trait ConnectionHandler {
    /// Transmit `data` to the peer
    ///
    /// Blocks until every byte has been accepted by the socket or a failure
    /// is certain. An empty slice returns immediately.
    fn on_data(&mut self, data: &[u8]) -> TransportResult<()>;

    /// The engine finished its handshake; the session is usable
    fn on_connected(&mut self) {}

    /// The engine hit a fatal error
    fn on_error(&mut self, _message: &str) {}

    /// The engine closed the session in an orderly way
    fn on_closed(&mut self) {}
}

/// Stateful consumer of the inbound byte stream
pub trait ProtocolEngine {
    /// Parse as much of `data` as possible
    ///
    /// # Arguments
    ///
    /// * `data` - Every byte received and not yet consumed, in arrival order
    /// * `handler` - Transport callbacks for sending and lifecycle events
    ///
    /// # Returns
    ///
    /// Number of leading bytes consumed, between 0 and `data.len()`. The rest
    /// is presented again, followed by newly received bytes, on the next call.
    fn parse(&mut self, data: &[u8], handler: &mut dyn ConnectionHandler) -> usize;
}

impl<F> ProtocolEngine for F
where
    F: FnMut(&[u8], &mut dyn ConnectionHandler) -> usize,
{
    fn parse(&mut self, data: &[u8], handler: &mut dyn ConnectionHandler) -> usize {
        self(data, handler)
    }
}
