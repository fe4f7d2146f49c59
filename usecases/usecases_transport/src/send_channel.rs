//! Send Channel Module
//!
//! Synchronous outbound path of the transport. The channel owns the connected
//! stream and is the `ConnectionHandler` handed to the protocol engine, so it
//! also records the session state the engine reports.
//!
//! A send returns only once every byte has been accepted by the socket or a
//! failure is certain. The writability wait is bounded by one overall
//! deadline per call; partial writes simply continue the loop.

use crate::engine::ConnectionHandler;
use crate::session::SessionState;
use entities_transport::{ByteStream, TransportError, TransportResult};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// Blocking outbound channel over a connected stream
#[derive(Debug)]
pub struct SendChannel<S> {
    stream: S,
    timeout: Duration,
    state: SessionState,
    failure: Option<TransportError>,
}

impl<S: ByteStream> SendChannel<S> {
    /// Create a channel over a connected stream
    ///
    /// # Arguments
    ///
    /// * `stream` - Connected stream, owned by the channel from now on
    /// * `timeout` - Overall writability wait for one `send` call
    pub fn new(stream: S, timeout: Duration) -> Self {
        Self {
            stream,
            timeout,
            state: SessionState::Connecting,
            failure: None,
        }
    }

    /// Transmit the whole buffer
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every byte was accepted by the socket
    /// * `Err(TransportError)` - `SendTimeout` if the socket did not become
    ///   writable in time, `Send` if a write failed, or the error that
    ///   previously ended the session
    pub fn send(&mut self, data: &[u8]) -> TransportResult<()> {
        if data.is_empty() {
            return Ok(());
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let result = self.transmit(data);
        if let Err(err) = &result {
            self.fail(err.clone());
        }
        result
    }

    fn transmit(&mut self, data: &[u8]) -> TransportResult<()> {
        let deadline = Instant::now().checked_add(self.timeout);
        let mut total_sent = 0;

        while total_sent < data.len() {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => self.timeout,
            };

            let writable = self
                .stream
                .wait_writable(remaining)
                .map_err(|e| TransportError::send(&e))?;
            if !writable {
                warn!(
                    sent = total_sent,
                    requested = data.len(),
                    timeout = ?self.timeout,
                    "socket did not become writable in time"
                );
                return Err(TransportError::send_timeout());
            }

            match self.stream.send(&data[total_sent..]) {
                Ok(0) => {
                    let err = io::Error::from(io::ErrorKind::WriteZero);
                    return Err(TransportError::send(&err));
                }
                Ok(n) => {
                    total_sent += n;
                    trace!(accepted = n, total_sent, requested = data.len(), "write");
                }
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(error = %e, sent = total_sent, "write failed");
                    return Err(TransportError::send(&e));
                }
            }
        }

        Ok(())
    }

    /// Record a fatal session error; the first one wins
    pub fn fail(&mut self, err: TransportError) {
        self.state = SessionState::Failed;
        if self.failure.is_none() {
            error!(error = %err, phase = %err.phase(), code = err.code(), "transport session failed");
            self.failure = Some(err);
        }
    }

    /// Error that ended the session, if any
    pub fn failure(&self) -> Option<&TransportError> {
        self.failure.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

impl<S: ByteStream> ConnectionHandler for SendChannel<S> {
    fn on_data(&mut self, data: &[u8]) -> TransportResult<()> {
        self.send(data)
    }

    fn on_connected(&mut self) {
        if self.state == SessionState::Connecting {
            info!("protocol session established");
            self.state = SessionState::Connected;
        }
    }

    fn on_error(&mut self, message: &str) {
        self.fail(TransportError::protocol(message));
    }

    fn on_closed(&mut self) {
        if self.state != SessionState::Failed {
            info!("protocol session closed");
            self.state = SessionState::Closed;
        }
    }
}
