//! Audit log storage trait.

use evote_types::AuditEvent;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// An audit event with the sequence number it was stored under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub seq: u64,
    pub event: AuditEvent,
}

pub trait AuditStore {
    /// Append an event and return its sequence number (1-based, gapless).
    fn append_audit(&self, event: &AuditEvent) -> Result<u64, StoreError>;
    /// Up to `limit` most recent entries, newest first.
    fn recent_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError>;
    fn audit_count(&self) -> Result<u64, StoreError>;
}
