// src/core/progress.rs
//! Submission status publishing and byte-counted upload bodies

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Simulating,
    Transmitting,
    Parsing,
    Settled(Settlement),
}

/// Snapshot observed by subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmissionStatus {
    pub phase: Phase,
    pub progress: Option<u8>,
    pub in_flight: bool,
}

/// Shared handle to the controller's status channel
#[derive(Debug, Clone)]
pub struct StatusPublisher {
    tx: Arc<watch::Sender<SubmissionStatus>>,
}

impl Default for StatusPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPublisher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SubmissionStatus::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SubmissionStatus {
        *self.tx.borrow()
    }

    /// Enter Validating with the in-flight flag set and no progress
    pub fn begin(&self) {
        self.tx.send_replace(SubmissionStatus {
            phase: Phase::Validating,
            progress: None,
            in_flight: true,
        });
    }

    pub fn enter(&self, phase: Phase) {
        self.tx.send_if_modified(|status| {
            if status.phase == phase {
                return false;
            }
            status.phase = phase;
            true
        });
    }

    /// Raise progress; lower or equal values are ignored
    pub fn advance(&self, percent: u8) {
        let percent = percent.min(100);
        self.tx.send_if_modified(|status| match status.progress {
            Some(current) if current >= percent => false,
            _ => {
                status.progress = Some(percent);
                true
            }
        });
    }

    fn settle(&self, settlement: Option<Settlement>) {
        self.tx.send_modify(|status| {
            status.phase = settlement.map(Phase::Settled).unwrap_or(Phase::Idle);
            status.progress = None;
            status.in_flight = false;
        });
    }
}

/// Clears in-flight state exactly once, on explicit settle or on drop
pub struct SettleGuard {
    publisher: StatusPublisher,
    settled: bool,
}

impl SettleGuard {
    pub fn new(publisher: StatusPublisher) -> Self {
        publisher.begin();
        Self {
            publisher,
            settled: false,
        }
    }

    pub fn settle(mut self, settlement: Settlement) {
        self.settled = true;
        self.publisher.settle(Some(settlement));
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.publisher.settle(None);
        }
    }
}

/// `round(sent / total * 100)`, or None when the total is unknown
pub fn percent_of(sent: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let sent = sent.min(total);
    Some(((sent as f64 / total as f64) * 100.0).round() as u8)
}

/// Split `content` into chunks, publishing progress as each chunk is handed to the transport
pub fn counted_chunks(
    content: Bytes,
    chunk_size: usize,
    publisher: StatusPublisher,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let total = content.len() as u64;
    let chunk_size = chunk_size.max(1);
    let mut sent = 0u64;

    let chunks: Vec<Bytes> = (0..content.len())
        .step_by(chunk_size)
        .map(|start| content.slice(start..(start + chunk_size).min(content.len())))
        .collect();

    stream::iter(chunks).then(move |chunk| {
        sent += chunk.len() as u64;
        if let Some(percent) = percent_of(sent, total) {
            publisher.advance(percent);
        }
        async move {
            // Observers see each step before the next chunk is pulled
            tokio::task::yield_now().await;
            Ok(chunk)
        }
    })
}
