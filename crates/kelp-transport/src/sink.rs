//! Datagram sink capability

use std::sync::Arc;

use parking_lot::Mutex;

use kelp_core::{KelpError, KelpResult};

/// Something that can send one datagram, best effort
///
/// No acknowledgment, ordering or retry is implied. An `Err` means the
/// payload was not handed to the network.
pub trait DatagramSink {
    fn send(&mut self, payload: &[u8]) -> KelpResult<()>;
}

impl<S: DatagramSink + ?Sized> DatagramSink for Box<S> {
    fn send(&mut self, payload: &[u8]) -> KelpResult<()> {
        (**self).send(payload)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    sent: Vec<Vec<u8>>,
    attempts: u64,
    failures_left: u32,
}

/// In-memory sink collecting every payload
///
/// Clones share the same buffer, so a test can keep one handle while the
/// emitter owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` sends fail
    pub fn fail_next(&self, count: u32) {
        self.inner.lock().failures_left = count;
    }

    /// Payloads successfully sent, oldest first
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.inner.lock().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.inner.lock().sent.len()
    }

    /// Sends attempted, including failed ones
    pub fn attempts(&self) -> u64 {
        self.inner.lock().attempts
    }

    pub fn last(&self) -> Option<Vec<u8>> {
        self.inner.lock().sent.last().cloned()
    }

    pub fn clear(&self) {
        self.inner.lock().sent.clear();
    }
}

impl DatagramSink for MemorySink {
    fn send(&mut self, payload: &[u8]) -> KelpResult<()> {
        let mut inner = self.inner.lock();
        inner.attempts += 1;

        if inner.failures_left > 0 {
            inner.failures_left -= 1;
            return Err(KelpError::TransportError("simulated send failure".into()));
        }

        inner.sent.push(payload.to_vec());
        Ok(())
    }
}
