//! HTTP surface for the evote node.
//!
//! Provides endpoints for:
//! - Eligible elections for the calling voter
//! - Candidate listings with party display metadata
//! - Vote submission and public receipt verification
//! - Audit log reads and the admin live feed (WebSocket)
//! - Health and Prometheus metrics
//!
//! Callers authenticate with a signed bearer token; [`auth::AuthContext`]
//! is resolved once per request and checked by each handler.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod pagination;
pub mod server;
pub mod state;
pub mod ws;

pub use auth::{AuthContext, AuthError};
pub use error::RpcError;
pub use metrics::ServiceMetrics;
pub use server::{router, RpcServer};
pub use state::AppState;
