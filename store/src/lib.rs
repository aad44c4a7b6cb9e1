//! Abstract storage traits for the evote core.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod audit;
pub mod ballot;
pub mod candidate;
pub mod election;
pub mod error;
pub mod meta;
pub mod voter;

pub use audit::{AuditEntry, AuditStore};
pub use ballot::BallotStore;
pub use candidate::CandidateStore;
pub use election::ElectionStore;
pub use error::StoreError;
pub use meta::MetaStore;
pub use voter::VoterStore;

/// Every store the node needs, behind one object.
pub trait VotingStore:
    VoterStore + ElectionStore + CandidateStore + BallotStore + AuditStore + Send + Sync
{
}

impl<T> VotingStore for T where
    T: VoterStore + ElectionStore + CandidateStore + BallotStore + AuditStore + Send + Sync
{
}
