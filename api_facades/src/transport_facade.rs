//! Transport Facade Module
//!
//! `TransportAdapter` ties the layers together for one connection:
//!
//! 1. acquire the process-wide network subsystem
//! 2. resolve the host and connect to the first candidate that accepts
//! 3. pump inbound bytes into the caller's protocol engine
//! 4. deliver outbound bytes handed over by the engine
//!
//! Acquisition is undone in reverse order. If construction fails part way,
//! whatever was already acquired is released before the error is returned.
//! On drop the write half is shut down, the socket closed and the subsystem
//! guard released, in that order.

use adapters_socket::{Connector, Resolve, Socket};
use entities_transport::{TransportConfig, TransportError, TransportResult};
use frameworks_system_integration::{NetworkSubsystem, SubsystemGuard};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, info, instrument};
use usecases_transport::{ConnectionHandler, ProtocolEngine, ReceivePump, SendChannel, SessionState};

/// Synchronous stream transport for one protocol session
///
/// Fields are dropped in declaration order: the socket (inside the channel)
/// goes before the subsystem guard.
#[derive(Debug)]
pub struct TransportAdapter {
    channel: SendChannel<Socket>,
    pump: ReceivePump,
    config: TransportConfig,
    closed: bool,
    _subsystem: SubsystemGuard,
}

impl TransportAdapter {
    /// Connect to `config.host:config.port`
    ///
    /// # Returns
    ///
    /// * `Ok(TransportAdapter)` - Connected adapter ready to pump and send
    /// * `Err(TransportError)` - Resolve, SocketCreate or Connect error; nothing
    ///   stays acquired
    pub fn connect(config: TransportConfig) -> TransportResult<Self> {
        let connector = Connector::new().with_connect_timeout(config.connect_timeout);
        Self::connect_with(&connector, config)
    }

    /// Connect through a caller-provided connector
    #[instrument(skip(connector, config), fields(host = %config.host, port = %config.port))]
    pub fn connect_with<R: Resolve>(connector: &Connector<R>, config: TransportConfig) -> TransportResult<Self> {
        let subsystem = NetworkSubsystem::acquire();
        // An error here drops `subsystem` before it reaches the caller
        let socket = connector.connect(&config.host, &config.port)?;

        let adapter = Self {
            channel: SendChannel::new(socket, config.send_timeout),
            pump: ReceivePump::new(config.recv_chunk_size),
            config,
            closed: false,
            _subsystem: subsystem,
        };
        info!(
            peer = ?adapter.peer_addr(),
            send_timeout = ?adapter.channel.timeout(),
            chunk_size = adapter.pump.chunk_size(),
            "transport adapter connected"
        );
        Ok(adapter)
    }

    /// Drain everything currently readable into the engine without blocking
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - New data was handed to the engine
    /// * `Ok(false)` - Nothing was available
    /// * `Err(TransportError)` - Receive error, or the error that already ended
    ///   the session (a failed send or an engine error notification)
    #[instrument(level = "trace", skip(self, engine))]
    pub fn pump<E: ProtocolEngine + ?Sized>(&mut self, engine: &mut E) -> TransportResult<bool> {
        self.pump.pump(&mut self.channel, engine)
    }

    /// Wait for inbound data, then pump
    ///
    /// `timeout` defaults to the configured poll interval.
    #[instrument(level = "trace", skip(self, engine))]
    pub fn wait_and_pump<E: ProtocolEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        timeout: Option<Duration>,
    ) -> TransportResult<bool> {
        let timeout = timeout.unwrap_or(self.config.poll_interval);
        self.pump.wait_and_pump(&mut self.channel, engine, timeout)
    }

    /// Transmit the whole buffer, blocking up to the send timeout
    #[instrument(level = "debug", skip(self, data), fields(len = data.len()))]
    pub fn send(&mut self, data: &[u8]) -> TransportResult<()> {
        self.channel.send(data)
    }

    /// The handler the engine uses for sends and lifecycle notifications
    pub fn handler(&mut self) -> &mut dyn ConnectionHandler {
        &mut self.channel
    }

    pub fn state(&self) -> SessionState {
        self.channel.state()
    }

    /// Error that ended the session, if any
    pub fn failure(&self) -> Option<&TransportError> {
        self.channel.failure()
    }

    /// Whether a zero-length read has been observed
    pub fn peer_closed(&self) -> bool {
        self.pump.peer_closed()
    }

    /// Bytes received but not yet consumed by the engine
    pub fn buffered(&self) -> &[u8] {
        self.pump.buffered()
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.channel.stream().local_addr().ok()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.channel.stream().peer_addr().ok()
    }

    /// Shut down the write half and release the connection
    ///
    /// Same teardown as dropping the adapter, but the shutdown result is
    /// reported instead of ignored.
    pub fn close(mut self) -> TransportResult<()> {
        self.closed = true;
        let result = self.channel.stream().shutdown_write();
        debug!(ok = result.is_ok(), "write half shut down");
        result.map_err(|e| TransportError::send(&e))
    }
}

impl Drop for TransportAdapter {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.channel.stream().shutdown_write();
        }
        debug!(state = %self.channel.state(), "transport adapter released");
    }
}
