//! Candidate and party storage trait.

use evote_types::{Candidate, CandidateId, ElectionId, Party, PartyId};

use crate::StoreError;

pub trait CandidateStore {
    fn get_candidate(&self, id: CandidateId) -> Result<Candidate, StoreError>;
    /// Insert or replace a candidate and index it under its election.
    fn put_candidate(&self, candidate: &Candidate) -> Result<(), StoreError>;
    /// Candidates standing in `election_id`, in id order.
    fn candidates_for_election(&self, election_id: ElectionId)
        -> Result<Vec<Candidate>, StoreError>;

    fn get_party(&self, id: PartyId) -> Result<Party, StoreError>;
    fn put_party(&self, party: &Party) -> Result<(), StoreError>;
}
