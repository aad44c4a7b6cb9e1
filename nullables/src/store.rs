//! Nullable store: thread-safe in-memory storage for testing.
//!
//! Every table sits behind one mutex, so `record_ballot` is atomic in the
//! same way an LMDB write transaction is: all checks and inserts happen
//! under the lock, and nothing is inserted unless every check passes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use evote_store::{
    AuditEntry, AuditStore, BallotStore, CandidateStore, ElectionStore, StoreError, VoterStore,
};
use evote_types::{
    AuditEvent, CancelFlag, Candidate, CandidateId, Election, ElectionId, ParticipationRecord,
    Party, PartyId, ReceiptHash, VoteRecord, Voter, VoterId,
};

#[derive(Default)]
struct Tables {
    voters: BTreeMap<VoterId, Voter>,
    elections: BTreeMap<ElectionId, Election>,
    parties: BTreeMap<PartyId, Party>,
    candidates: BTreeMap<CandidateId, Candidate>,
    votes: BTreeMap<ReceiptHash, VoteRecord>,
    participations: BTreeMap<(VoterId, ElectionId), ParticipationRecord>,
    audit: Vec<AuditEvent>,
}

/// An in-memory implementation of every store trait.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_ballot_writes: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `record_ballot` fail with a backend error after
    /// its checks pass, as a failed commit would.
    pub fn fail_ballot_writes(&self, fail: bool) {
        self.fail_ballot_writes.store(fail, Ordering::SeqCst);
    }

    /// Every stored vote row, in receipt order.
    pub fn votes(&self) -> Vec<VoteRecord> {
        self.tables.lock().unwrap().votes.values().cloned().collect()
    }

    /// Every participation row.
    pub fn participations(&self) -> Vec<ParticipationRecord> {
        self.tables
            .lock()
            .unwrap()
            .participations
            .values()
            .cloned()
            .collect()
    }
}

impl VoterStore for NullStore {
    fn get_voter(&self, id: VoterId) -> Result<Voter, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .voters
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("voter {id}")))
    }

    fn put_voter(&self, voter: &Voter) -> Result<(), StoreError> {
        self.tables
            .lock()
            .unwrap()
            .voters
            .insert(voter.id, voter.clone());
        Ok(())
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().voters.len() as u64)
    }
}

impl ElectionStore for NullStore {
    fn get_election(&self, id: ElectionId) -> Result<Election, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .elections
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("election {id}")))
    }

    fn put_election(&self, election: &Election) -> Result<(), StoreError> {
        self.tables
            .lock()
            .unwrap()
            .elections
            .insert(election.id, election.clone());
        Ok(())
    }

    fn iter_elections(&self) -> Result<Vec<Election>, StoreError> {
        Ok(self.tables.lock().unwrap().elections.values().cloned().collect())
    }
}

impl CandidateStore for NullStore {
    fn get_candidate(&self, id: CandidateId) -> Result<Candidate, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .candidates
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("candidate {id}")))
    }

    fn put_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        self.tables
            .lock()
            .unwrap()
            .candidates
            .insert(candidate.id, candidate.clone());
        Ok(())
    }

    fn candidates_for_election(
        &self,
        election_id: ElectionId,
    ) -> Result<Vec<Candidate>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .candidates
            .values()
            .filter(|c| c.election_id == election_id)
            .cloned()
            .collect())
    }

    fn get_party(&self, id: PartyId) -> Result<Party, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .parties
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("party {id}")))
    }

    fn put_party(&self, party: &Party) -> Result<(), StoreError> {
        self.tables
            .lock()
            .unwrap()
            .parties
            .insert(party.id, party.clone());
        Ok(())
    }
}

impl BallotStore for NullStore {
    fn has_participated(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .participations
            .contains_key(&(voter_id, election_id)))
    }

    fn record_ballot(
        &self,
        vote: &VoteRecord,
        participation: &ParticipationRecord,
        cancel: &CancelFlag,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let key = (participation.voter_id, participation.election_id);

        if tables.votes.contains_key(&vote.receipt) {
            return Err(StoreError::Duplicate("receipt".to_string()));
        }
        if tables.participations.contains_key(&key) {
            return Err(StoreError::Duplicate("participation".to_string()));
        }
        if self.fail_ballot_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        if cancel.is_cancelled() {
            return Err(StoreError::Aborted("caller cancelled before commit".to_string()));
        }

        tables.votes.insert(
            vote.receipt,
            VoteRecord {
                cast_at: vote.cast_at.truncate_to_secs(),
                ..vote.clone()
            },
        );
        tables.participations.insert(
            key,
            ParticipationRecord {
                participated_at: participation.participated_at.truncate_to_secs(),
                ..participation.clone()
            },
        );
        Ok(())
    }

    fn vote_by_receipt(&self, receipt: &ReceiptHash) -> Result<VoteRecord, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .votes
            .get(receipt)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("receipt".to_string()))
    }

    fn vote_count(&self, election_id: ElectionId) -> Result<u64, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .votes
            .values()
            .filter(|v| v.election_id == election_id)
            .count() as u64)
    }

    fn participation_count(&self, election_id: ElectionId) -> Result<u64, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .participations
            .keys()
            .filter(|(_, e)| *e == election_id)
            .count() as u64)
    }
}

impl AuditStore for NullStore {
    fn append_audit(&self, event: &AuditEvent) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.audit.push(event.clone());
        Ok(tables.audit.len() as u64)
    }

    fn recent_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .audit
            .iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(i, event)| AuditEntry {
                seq: i as u64 + 1,
                event: event.clone(),
            })
            .collect())
    }

    fn audit_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().audit.len() as u64)
    }
}
