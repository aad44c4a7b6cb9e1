//! LMDB implementation of CandidateStore.
//!
//! `election_candidates` is a presence-only index keyed
//! `election_id_be ++ candidate_id_be`, so listing an election's candidates
//! is a prefix scan.

use evote_store::{CandidateStore, StoreError};
use evote_types::{Candidate, CandidateId, ElectionId, Party, PartyId};

use crate::environment::{composite_key, range_prefix};
use crate::{LmdbEnvironment, LmdbError};

impl CandidateStore for LmdbEnvironment {
    fn get_candidate(&self, id: CandidateId) -> Result<Candidate, StoreError> {
        Ok(self.get_decoded(
            self.candidates_db,
            &id.to_be_bytes(),
            &format!("candidate {id}"),
        )?)
    }

    fn put_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        let key = candidate.id.to_be_bytes();
        let bytes = bincode::serialize(candidate).map_err(LmdbError::from)?;
        let mut wtxn = self.env().write_txn().map_err(LmdbError::from)?;

        // A candidate moved to another election leaves no stale index entry.
        let previous: Option<Candidate> =
            match self.candidates_db.get(&wtxn, &key).map_err(LmdbError::from)? {
                Some(bytes) => Some(bincode::deserialize(bytes).map_err(LmdbError::from)?),
                None => None,
            };
        if let Some(old) = previous {
            if old.election_id != candidate.election_id {
                let stale = composite_key(old.election_id.to_be_bytes(), &key);
                self.election_candidates_db
                    .delete(&mut wtxn, &stale)
                    .map_err(LmdbError::from)?;
            }
        }

        self.candidates_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        let index = composite_key(candidate.election_id.to_be_bytes(), &key);
        self.election_candidates_db
            .put(&mut wtxn, &index, &[])
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn candidates_for_election(
        &self,
        election_id: ElectionId,
    ) -> Result<Vec<Candidate>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for result in range_prefix(self.election_candidates_db, &rtxn, election_id.to_be_bytes())? {
            let (index_key, _) = result.map_err(LmdbError::from)?;
            let candidate_key = &index_key[8..];
            let bytes = self
                .candidates_db
                .get(&rtxn, candidate_key)
                .map_err(LmdbError::from)?
                .ok_or_else(|| {
                    LmdbError::Corruption(format!(
                        "election {election_id} indexes a missing candidate"
                    ))
                })?;
            let candidate: Candidate = bincode::deserialize(bytes).map_err(LmdbError::from)?;
            results.push(candidate);
        }
        Ok(results)
    }

    fn get_party(&self, id: PartyId) -> Result<Party, StoreError> {
        Ok(self.get_decoded(self.parties_db, &id.to_be_bytes(), &format!("party {id}"))?)
    }

    fn put_party(&self, party: &Party) -> Result<(), StoreError> {
        Ok(self.put_encoded(self.parties_db, &party.id.to_be_bytes(), party)?)
    }
}
