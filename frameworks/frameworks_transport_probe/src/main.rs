//! Transport Probe Binary Entry Point
//!
//! Logging goes through `tracing`; set `RUST_LOG` to change the level
//! (default `info`).

use std::process;

use clap::Parser;
use frameworks_transport_probe::{run, ProbeArgs};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = ProbeArgs::parse();

    match run(&args) {
        Ok(report) => {
            for line in &report.lines {
                println!("{}", line);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {} ({} phase)", e, e.phase());
            process::exit(1);
        }
    }
}
