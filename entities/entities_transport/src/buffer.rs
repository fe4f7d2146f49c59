//! Receive Buffer Module
//!
//! Holds bytes that have been received from the socket but not yet consumed by
//! the protocol engine. New bytes are always appended after the retained
//! suffix, so the engine sees the stream in arrival order with no gaps and no
//! duplicates across pump cycles.

use tracing::warn;

/// Bytes received but not yet consumed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReceiveBuffer {
    data: Vec<u8>,
}

impl ReceiveBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Append newly received bytes after the retained content
    pub fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Drop the first `count` bytes, keeping the unconsumed suffix
    ///
    /// A count larger than the buffer is clamped to its length.
    ///
    /// # Returns
    ///
    /// Number of bytes actually removed
    pub fn consume(&mut self, count: usize) -> usize {
        let count = if count > self.data.len() {
            warn!(
                consumed = count,
                buffered = self.data.len(),
                "engine reported consuming more bytes than were buffered"
            );
            self.data.len()
        } else {
            count
        };
        self.data.drain(..count);
        count
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}
