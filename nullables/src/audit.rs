//! Nullable audit sink: records events in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use evote_audit::AuditSink;
use evote_types::AuditEvent;

/// Collects every recorded event. When set to "failing", events are
/// discarded instead, which is what a broken sink looks like to callers.
#[derive(Debug, Default)]
pub struct NullAuditSink {
    events: Mutex<Vec<AuditEvent>>,
    failing: AtomicBool,
}

impl NullAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sink = Self::default();
        sink.failing.store(true, Ordering::SeqCst);
        sink
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for NullAuditSink {
    fn record(&self, event: AuditEvent) {
        if self.failing.load(Ordering::SeqCst) {
            return;
        }
        self.events.lock().unwrap().push(event);
    }
}
