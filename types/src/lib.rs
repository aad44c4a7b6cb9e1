//! Fundamental types for the evote core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identifiers, timestamps, jurisdictions, the election/voter/candidate entities,
//! the anonymised vote and participation records, and access-control roles.

pub mod access;
pub mod audit;
pub mod ballot;
pub mod cancel;
pub mod candidate;
pub mod election;
pub mod error;
pub mod hash;
pub mod ids;
pub mod jurisdiction;
pub mod time;
pub mod voter;

pub use access::{Capability, Permission, PermissionSet, Role};
pub use audit::AuditEvent;
pub use ballot::{ParticipationRecord, VoteRecord};
pub use cancel::{CancelFlag, CancelOnDrop};
pub use candidate::{Candidate, Party};
pub use election::{Election, ElectionStatus, ElectionType};
pub use error::TypesError;
pub use hash::ReceiptHash;
pub use ids::{CandidateId, ElectionId, PartyId, VoterId};
pub use jurisdiction::Jurisdiction;
pub use time::{Clock, SystemClock, Timestamp};
pub use voter::Voter;
