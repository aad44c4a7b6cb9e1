//! Audit trail for state-changing actions.
//!
//! Callers hand an [`AuditEvent`] to an [`AuditSink`] and move on: sinks never
//! block and never fail the caller. [`ChannelAuditSink`] queues events for an
//! [`AuditWorker`], which persists them and fans vote notifications out to the
//! [`AdminFeed`].

pub mod feed;
pub mod sink;
pub mod worker;

pub use evote_types::AuditEvent;
pub use feed::{AdminFeed, FeedMessage};
pub use sink::{audit_channel, AuditSink, ChannelAuditSink, TracingAuditSink};
pub use worker::AuditWorker;
