//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (clock, storage, audit) are abstracted behind
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod audit;
pub mod clock;
pub mod store;

pub use audit::NullAuditSink;
pub use clock::NullClock;
pub use store::NullStore;
