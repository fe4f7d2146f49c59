//! Receive Pump Module
//!
//! Inbound path of the transport. One pump cycle drains everything the socket
//! currently has to offer, chunk by chunk, and after every chunk hands the
//! whole retained buffer to the protocol engine. Bytes the engine does not
//! consume stay at the front of the buffer for the next cycle.
//!
//! `pump` never blocks: readiness is checked with a zero wait before every
//! read. `wait_and_pump` is the blocking variant for event loops; it waits up
//! to a caller-chosen interval for data before pumping.
//!
//! A read of zero bytes is not treated as end of session. It ends the current
//! cycle and is recorded in [`ReceivePump::peer_closed`], leaving the decision
//! to the caller and the protocol engine.

use crate::engine::ProtocolEngine;
use crate::send_channel::SendChannel;
use entities_transport::{ByteStream, ReceiveBuffer, TransportError, TransportResult};
use std::io;
use std::time::Duration;
use tracing::{trace, warn};

/// Drains the socket into the retained buffer and feeds the engine
#[derive(Debug)]
pub struct ReceivePump {
    buffer: ReceiveBuffer,
    chunk: Vec<u8>,
    peer_closed: bool,
}

impl ReceivePump {
    /// Create a pump reading at most `chunk_size` bytes per read
    pub fn new(chunk_size: usize) -> Self {
        Self {
            buffer: ReceiveBuffer::new(),
            chunk: vec![0; chunk_size.max(1)],
            peer_closed: false,
        }
    }

    /// Run one non-blocking pump cycle
    ///
    /// # Arguments
    ///
    /// * `channel` - Channel owning the stream; also handed to the engine
    /// * `engine` - Protocol engine receiving the retained buffer
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - At least one chunk of new data was passed to the engine
    /// * `Ok(false)` - Nothing was available
    /// * `Err(TransportError)` - A read failed, or the session already ended
    ///   (including failures the engine swallowed during this cycle)
    pub fn pump<S, E>(&mut self, channel: &mut SendChannel<S>, engine: &mut E) -> TransportResult<bool>
    where
        S: ByteStream,
        E: ProtocolEngine + ?Sized,
    {
        if let Some(err) = channel.failure() {
            return Err(err.clone());
        }

        let mut pumped = false;
        loop {
            let readable = match channel.stream_mut().wait_readable(Duration::ZERO) {
                Ok(readable) => readable,
                Err(e) => return Err(self.receive_failed(channel, &e)),
            };
            if !readable {
                break;
            }

            let received = match channel.stream_mut().recv(&mut self.chunk) {
                Ok(0) => {
                    if !self.peer_closed {
                        warn!(
                            buffered = self.buffer.len(),
                            "zero-length read; peer may have closed the connection"
                        );
                    }
                    self.peer_closed = true;
                    break;
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.receive_failed(channel, &e)),
            };

            self.buffer.append(&self.chunk[..received]);
            let consumed = engine.parse(self.buffer.as_slice(), &mut *channel);
            self.buffer.consume(consumed);
            pumped = true;
            trace!(received, consumed, retained = self.buffer.len(), "pump cycle chunk");

            if let Some(err) = channel.failure() {
                return Err(err.clone());
            }
        }

        Ok(pumped)
    }

    /// Wait up to `timeout` for data, then run a pump cycle
    ///
    /// Returns `Ok(false)` without pumping when nothing arrived in time.
    pub fn wait_and_pump<S, E>(
        &mut self,
        channel: &mut SendChannel<S>,
        engine: &mut E,
        timeout: Duration,
    ) -> TransportResult<bool>
    where
        S: ByteStream,
        E: ProtocolEngine + ?Sized,
    {
        if let Some(err) = channel.failure() {
            return Err(err.clone());
        }

        match channel.stream_mut().wait_readable(timeout) {
            Ok(true) => self.pump(channel, engine),
            Ok(false) => Ok(false),
            Err(e) => Err(self.receive_failed(channel, &e)),
        }
    }

    fn receive_failed<S: ByteStream>(&self, channel: &mut SendChannel<S>, e: &io::Error) -> TransportError {
        let err = TransportError::receive(e);
        channel.fail(err.clone());
        err
    }

    /// Bytes received but not yet consumed by the engine
    pub fn buffered(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Whether a zero-length read has been observed
    pub fn peer_closed(&self) -> bool {
        self.peer_closed
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk.len()
    }
}
