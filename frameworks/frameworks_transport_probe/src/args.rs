//! Command-Line Argument Parsing Module
//!
//! Maps the probe's flags onto a `TransportConfig`.

use clap::Parser;
use entities_transport::config::{DEFAULT_HOST, DEFAULT_PORT};
use entities_transport::TransportConfig;
use std::time::Duration;

/// Transport probe command-line arguments
#[derive(Parser, Debug)]
#[command(name = "transport-probe")]
#[command(about = "Connect to a stream endpoint and log the lines it sends")]
pub struct ProbeArgs {
    /// DNS name or IP address of the peer
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Service name or port number
    #[arg(long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Overall writability wait for one send, in milliseconds
    #[arg(long, default_value_t = 15_000)]
    pub send_timeout_ms: u64,

    /// Readiness wait between pump cycles, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub poll_interval_ms: u64,

    /// Per-candidate connect timeout, in milliseconds
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Line to send after connecting (can be specified multiple times)
    #[arg(long)]
    pub send: Vec<String>,

    /// Stop after this many consecutive polls without data
    #[arg(long)]
    pub max_idle_polls: Option<u64>,
}

impl ProbeArgs {
    pub fn to_config(&self) -> TransportConfig {
        let mut config = TransportConfig::new(self.host.clone(), self.port.clone())
            .with_send_timeout(Duration::from_millis(self.send_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms));
        if let Some(ms) = self.connect_timeout_ms {
            config = config.with_connect_timeout(Duration::from_millis(ms));
        }
        config
    }

    /// Outbound payload: every `--send` value as a newline-terminated line
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        for line in &self.send {
            payload.extend_from_slice(line.as_bytes());
            payload.push(b'\n');
        }
        payload
    }
}
