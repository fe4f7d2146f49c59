//! Frameworks Layer: Transport Probe
//!
//! Command-line driver for the transport adapter. The probe connects, sends
//! the requested lines, then pumps inbound data through a line-oriented
//! protocol engine that logs every complete line it sees.

pub mod args;
pub mod line_engine;
pub mod probe;

pub use args::ProbeArgs;
pub use line_engine::LineEngine;
pub use probe::{run, ProbeReport};
