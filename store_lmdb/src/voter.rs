//! LMDB implementation of VoterStore.

use evote_store::{StoreError, VoterStore};
use evote_types::{Voter, VoterId};

use crate::LmdbEnvironment;

impl VoterStore for LmdbEnvironment {
    fn get_voter(&self, id: VoterId) -> Result<Voter, StoreError> {
        Ok(self.get_decoded(self.voters_db, &id.to_be_bytes(), &format!("voter {id}"))?)
    }

    fn put_voter(&self, voter: &Voter) -> Result<(), StoreError> {
        Ok(self.put_encoded(self.voters_db, &voter.id.to_be_bytes(), voter)?)
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        Ok(self.count(self.voters_db)?)
    }
}
