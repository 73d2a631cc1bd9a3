//! Change-gated emitter
//!
//! Sends the full active-state set only when it differs from the last set
//! that was actually sent. A failed send leaves the snapshot untouched so the
//! next call with a differing set tries again.

use tracing::{debug, warn};

use kelp_core::SignalSet;
use kelp_transport::DatagramSink;
use kelp_wire::GestureMessage;

/// What `maybe_emit` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Same as the last sent set; no I/O
    Unchanged,
    /// Handed to the sink
    Sent,
    /// Encoding or send failed; will retry on the next differing set
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitterStats {
    pub sent: u64,
    pub failed: u64,
    pub unchanged: u64,
}

/// Emits gesture messages on change
pub struct ChangeGatedEmitter<S> {
    sink: S,
    last_sent: Option<SignalSet>,
    stats: EmitterStats,
}

impl<S: DatagramSink> ChangeGatedEmitter<S> {
    pub fn new(sink: S) -> Self {
        ChangeGatedEmitter {
            sink,
            last_sent: None,
            stats: EmitterStats::default(),
        }
    }

    /// Send `active` if it differs from the last sent set
    pub fn maybe_emit(&mut self, active: &SignalSet) -> EmitOutcome {
        if self.last_sent.as_ref() == Some(active) {
            self.stats.unchanged += 1;
            return EmitOutcome::Unchanged;
        }

        let payload = match GestureMessage::new(*active).encode() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode gesture message: {}", e);
                self.stats.failed += 1;
                return EmitOutcome::Failed;
            }
        };

        match self.sink.send(&payload) {
            Ok(()) => {
                debug!(
                    "Sent gesture states: [{}]",
                    active
                        .active()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                self.last_sent = Some(*active);
                self.stats.sent += 1;
                EmitOutcome::Sent
            }
            Err(e) => {
                warn!("Failed to send gesture message: {}", e);
                self.stats.failed += 1;
                EmitOutcome::Failed
            }
        }
    }

    /// Last set that reached the sink
    pub fn last_sent(&self) -> Option<&SignalSet> {
        self.last_sent.as_ref()
    }

    pub fn stats(&self) -> &EmitterStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
