//! Voter storage trait.

use evote_types::{Voter, VoterId};

use crate::StoreError;

pub trait VoterStore {
    fn get_voter(&self, id: VoterId) -> Result<Voter, StoreError>;
    fn put_voter(&self, voter: &Voter) -> Result<(), StoreError>;
    fn voter_count(&self) -> Result<u64, StoreError>;
}
