//! Scripted byte stream used by the unit tests

use entities_transport::ByteStream;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// What the next write call does
#[derive(Debug, Clone)]
pub enum WriteStep {
    /// Accept at most this many bytes
    Accept(usize),
    /// Report `WouldBlock`
    WouldBlock,
    /// Report `Interrupted`
    Interrupted,
    /// Fail with this OS code
    Fail(i32),
}

/// Stream whose reads, writes and readiness are scripted in advance
#[derive(Debug, Default)]
pub struct ScriptedStream {
    pub reads: VecDeque<io::Result<Vec<u8>>>,
    pub writes: VecDeque<WriteStep>,
    /// Scripted answers to readability waits; once empty, readable iff a read is queued
    pub readiness: VecDeque<bool>,
    pub never_writable: bool,
    pub written: Vec<u8>,
    pub write_calls: usize,
    pub writable_waits: Vec<Duration>,
    pub readable_waits: Vec<Duration>,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reads<I: IntoIterator<Item = &'static [u8]>>(chunks: I) -> Self {
        let mut stream = Self::new();
        for chunk in chunks {
            stream.push_read(chunk);
        }
        stream
    }

    pub fn push_read(&mut self, chunk: &[u8]) {
        self.reads.push_back(Ok(chunk.to_vec()));
    }

    pub fn push_read_error(&mut self, code: i32) {
        self.reads.push_back(Err(io::Error::from_raw_os_error(code)));
    }

    pub fn push_read_interrupted(&mut self) {
        self.reads.push_back(Err(io::ErrorKind::Interrupted.into()));
    }
}

impl ByteStream for ScriptedStream {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        self.readable_waits.push(timeout);
        Ok(self.readiness.pop_front().unwrap_or(!self.reads.is_empty()))
    }

    fn wait_writable(&mut self, timeout: Duration) -> io::Result<bool> {
        self.writable_waits.push(timeout);
        Ok(!self.never_writable)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            None => Err(io::ErrorKind::WouldBlock.into()),
            Some(Err(e)) => Err(e),
            Some(Ok(mut chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.reads.push_front(Ok(chunk.split_off(n)));
                }
                Ok(n)
            }
        }
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_calls += 1;
        match self.writes.pop_front() {
            None => {
                self.written.extend_from_slice(buf);
                Ok(buf.len())
            }
            Some(WriteStep::Accept(max)) => {
                let n = max.min(buf.len());
                self.written.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            Some(WriteStep::WouldBlock) => Err(io::ErrorKind::WouldBlock.into()),
            Some(WriteStep::Interrupted) => Err(io::ErrorKind::Interrupted.into()),
            Some(WriteStep::Fail(code)) => Err(io::Error::from_raw_os_error(code)),
        }
    }
}
