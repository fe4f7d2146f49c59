//! Probe Module
//!
//! Connect, send, then pump until the peer closes or the idle limit is hit.

use crate::args::ProbeArgs;
use crate::line_engine::LineEngine;
use api_facades::{SessionState, TransportAdapter};
use entities_transport::TransportResult;
use tracing::{debug, info, instrument, warn};

/// Outcome of one probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub lines: Vec<String>,
    pub bytes_sent: usize,
    pub peer_closed: bool,
    pub final_state: SessionState,
}

/// Run the probe described by `args`
#[instrument(skip(args), fields(host = %args.host, port = %args.port))]
pub fn run(args: &ProbeArgs) -> TransportResult<ProbeReport> {
    let mut adapter = TransportAdapter::connect(args.to_config())?;
    let mut engine = LineEngine::new();

    let payload = args.payload();
    adapter.send(&payload)?;
    if !payload.is_empty() {
        info!(bytes = payload.len(), lines = args.send.len(), "sent");
    }

    let mut idle_polls = 0;
    while !adapter.peer_closed() {
        if adapter.wait_and_pump(&mut engine, None)? {
            idle_polls = 0;
            continue;
        }
        idle_polls += 1;
        if args.max_idle_polls.is_some_and(|max| idle_polls >= max) {
            debug!(idle_polls, "idle limit reached");
            break;
        }
    }

    let report = finish(adapter, engine, payload.len());
    info!(lines = report.lines.len(), peer_closed = report.peer_closed, "probe finished");
    Ok(report)
}

/// Build the report, then close the connection
///
/// A failed close is logged; the lines already collected are still reported.
fn finish(adapter: TransportAdapter, engine: LineEngine, bytes_sent: usize) -> ProbeReport {
    let report = ProbeReport {
        peer_closed: adapter.peer_closed(),
        final_state: adapter.state(),
        bytes_sent,
        lines: engine.into_lines(),
    };
    if !adapter.buffered().is_empty() {
        debug!(bytes = adapter.buffered().len(), "unterminated trailing data dropped");
    }
    if let Err(err) = adapter.close() {
        warn!(error = %err, "closing the connection failed");
    }
    report
}
