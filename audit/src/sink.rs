//! Fire-and-forget audit sinks.

use prometheus::IntCounter;
use tokio::sync::mpsc::{self, error::TrySendError};

use evote_types::AuditEvent;

/// Receives audit events. Implementations must return promptly and must not
/// report failure to the caller; a lost audit event never undoes the action
/// it describes.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Writes each event as a structured log line on the `audit` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        let metadata = serde_json::Value::Object(event.metadata);
        tracing::info!(
            target: "audit",
            action = %event.action,
            actor_id = ?event.actor_id,
            actor_role = ?event.actor_role,
            target_id = ?event.target_id,
            metadata = %metadata,
            timestamp = event.timestamp.as_secs(),
            "audit event"
        );
    }
}

/// Queues events on a bounded channel for an [`crate::AuditWorker`].
///
/// When the queue is full or the worker has gone, the event is dropped with
/// a warning and the optional drop counter is incremented.
#[derive(Clone)]
pub struct ChannelAuditSink {
    tx: mpsc::Sender<AuditEvent>,
    dropped: Option<IntCounter>,
}

/// A sink and the receiving end to hand to the worker.
pub fn audit_channel(capacity: usize) -> (ChannelAuditSink, mpsc::Receiver<AuditEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelAuditSink { tx, dropped: None }, rx)
}

impl ChannelAuditSink {
    pub fn with_drop_counter(mut self, counter: IntCounter) -> Self {
        self.dropped = Some(counter);
        self
    }

    fn count_drop(&self) {
        if let Some(counter) = &self.dropped {
            counter.inc();
        }
    }
}

impl AuditSink for ChannelAuditSink {
    fn record(&self, event: AuditEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.count_drop();
                tracing::warn!(action = %event.action, "audit queue full, event dropped");
            }
            Err(TrySendError::Closed(event)) => {
                self.count_drop();
                tracing::warn!(action = %event.action, "audit worker gone, event dropped");
            }
        }
    }
}
