//! evote node: wires storage, the vote-casting core, the audit pipeline and
//! the HTTP surface into one process.
//!
//! The node:
//! - Opens and integrity-checks the LMDB environment
//! - Runs the audit worker that persists events and feeds the admin dashboard
//! - Serves the HTTP API until a shutdown signal arrives
//! - Seeds the store from JSON fixtures

pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod node;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::NodeError;
pub use import::{Fixtures, ImportSummary};
pub use logging::{init_logging, LogFormat};
pub use node::VotingNode;
pub use shutdown::ShutdownController;
