//! LMDB implementation of BallotStore.
//!
//! The vote table is keyed by `election_id ++ receipt` and holds no voter
//! identifier. The participation table is keyed by `voter_id ++ election_id`
//! and is written with `NO_OVERWRITE`: the key itself is the uniqueness
//! constraint.

use evote_store::{BallotStore, StoreError};
use evote_types::{CancelFlag, ElectionId, ParticipationRecord, ReceiptHash, VoteRecord, VoterId};

use crate::environment::{composite_key, count_prefix};
use crate::{LmdbEnvironment, LmdbError};

impl BallotStore for LmdbEnvironment {
    fn has_participated(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
    ) -> Result<bool, StoreError> {
        let key = composite_key(voter_id.to_be_bytes(), &election_id.to_be_bytes());
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let found = self
            .participations_db
            .get(&rtxn, &key)
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn record_ballot(
        &self,
        vote: &VoteRecord,
        participation: &ParticipationRecord,
        cancel: &CancelFlag,
    ) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        batch.insert_vote(vote)?;
        batch.insert_participation(participation)?;
        batch.commit(cancel)
    }

    fn vote_by_receipt(&self, receipt: &ReceiptHash) -> Result<VoteRecord, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let election = self
            .receipts_db
            .get(&rtxn, receipt.as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound("receipt".to_string()))?;
        let key = composite_key(
            election
                .try_into()
                .map_err(|_| LmdbError::Corruption("receipt index value length".to_string()))?,
            receipt.as_bytes(),
        );
        let bytes = self
            .votes_db
            .get(&rtxn, &key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::Corruption("receipt indexes a missing vote".to_string()))?;
        let vote: VoteRecord = bincode::deserialize(bytes).map_err(LmdbError::from)?;
        Ok(vote)
    }

    fn vote_count(&self, election_id: ElectionId) -> Result<u64, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        Ok(count_prefix(self.votes_db, &rtxn, election_id.to_be_bytes())?)
    }

    fn participation_count(&self, election_id: ElectionId) -> Result<u64, StoreError> {
        // Keys lead with the voter id, so this is a full scan.
        let suffix = election_id.to_be_bytes();
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let mut count = 0u64;
        for result in self.participations_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, _) = result.map_err(LmdbError::from)?;
            if key.len() == 16 && key[8..] == suffix {
                count += 1;
            }
        }
        Ok(count)
    }
}

