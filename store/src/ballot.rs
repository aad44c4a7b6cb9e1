//! Ballot storage: the anonymised vote rows and the participation ledger.

use evote_types::{CancelFlag, ElectionId, ParticipationRecord, ReceiptHash, VoteRecord, VoterId};

use crate::StoreError;

pub trait BallotStore {
    /// Whether a participation row exists for `(voter_id, election_id)`.
    ///
    /// A read-only fast path; [`BallotStore::record_ballot`] enforces the
    /// constraint on its own.
    fn has_participated(&self, voter_id: VoterId, election_id: ElectionId)
        -> Result<bool, StoreError>;

    /// Persist a vote and its participation row in one transaction.
    ///
    /// Backends must guarantee:
    /// - at most one participation row per `(voter, election)`, enforced at
    ///   write time; a second insert returns [`StoreError::Duplicate`];
    /// - receipts are unique; a clash also returns `Duplicate`;
    /// - if `cancel` is raised before commit, nothing is written and
    ///   [`StoreError::Aborted`] is returned;
    /// - on any error, neither row is persisted.
    fn record_ballot(
        &self,
        vote: &VoteRecord,
        participation: &ParticipationRecord,
        cancel: &CancelFlag,
    ) -> Result<(), StoreError>;

    fn vote_by_receipt(&self, receipt: &ReceiptHash) -> Result<VoteRecord, StoreError>;
    fn vote_count(&self, election_id: ElectionId) -> Result<u64, StoreError>;
    fn participation_count(&self, election_id: ElectionId) -> Result<u64, StoreError>;
}
