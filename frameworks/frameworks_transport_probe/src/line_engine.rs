//! Line Engine Module
//!
//! Minimal protocol engine: newline-terminated text lines. The first complete
//! line marks the session as connected. A trailing partial line is left
//! unconsumed so the transport presents it again once the rest arrives.

use tracing::info;
use usecases_transport::{ConnectionHandler, ProtocolEngine};

/// Engine that records complete lines
#[derive(Debug, Default)]
pub struct LineEngine {
    lines: Vec<String>,
}

impl LineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl ProtocolEngine for LineEngine {
    fn parse(&mut self, data: &[u8], handler: &mut dyn ConnectionHandler) -> usize {
        let mut consumed = 0;
        while let Some(pos) = data[consumed..].iter().position(|b| *b == b'\n') {
            let mut line = &data[consumed..consumed + pos];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            let line = String::from_utf8_lossy(line).into_owned();
            info!(number = self.lines.len() + 1, %line, "line received");

            if self.lines.is_empty() {
                handler.on_connected();
            }
            self.lines.push(line);
            consumed += pos + 1;
        }
        consumed
    }
}
