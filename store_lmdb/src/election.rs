//! LMDB implementation of ElectionStore.

use evote_store::{ElectionStore, StoreError};
use evote_types::{Election, ElectionId};

use crate::LmdbEnvironment;

impl ElectionStore for LmdbEnvironment {
    fn get_election(&self, id: ElectionId) -> Result<Election, StoreError> {
        Ok(self.get_decoded(
            self.elections_db,
            &id.to_be_bytes(),
            &format!("election {id}"),
        )?)
    }

    fn put_election(&self, election: &Election) -> Result<(), StoreError> {
        Ok(self.put_encoded(self.elections_db, &election.id.to_be_bytes(), election)?)
    }

    fn iter_elections(&self) -> Result<Vec<Election>, StoreError> {
        Ok(self.decode_all(self.elections_db)?)
    }
}
