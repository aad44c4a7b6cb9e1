//! Write batching: groups several table writes into a single LMDB write
//! transaction.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = env.write_batch()?;
//! batch.insert_vote(&vote)?;
//! batch.insert_participation(&participation)?;
//! batch.commit(&cancel)?;
//! ```
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], or any
//! step fails, all operations are rolled back (the underlying LMDB
//! transaction is aborted).

use heed::types::Bytes;
use heed::{Database, PutFlags, RwTxn};

use evote_store::StoreError;
use evote_types::{CancelFlag, ParticipationRecord, VoteRecord};

use crate::environment::composite_key;
use crate::{LmdbEnvironment, LmdbError};

pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

/// `voter_id_be ++ election_id_be`
pub(crate) fn participation_key(p: &ParticipationRecord) -> Vec<u8> {
    composite_key(p.voter_id.to_be_bytes(), &p.election_id.to_be_bytes())
}

/// `election_id_be ++ receipt`
pub(crate) fn vote_key(v: &VoteRecord) -> Vec<u8> {
    composite_key(v.election_id.to_be_bytes(), v.receipt.as_bytes())
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }

    fn put_unique(
        &mut self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &[u8],
        what: &str,
    ) -> Result<(), StoreError> {
        match db.put_with_flags(&mut self.txn, PutFlags::NO_OVERWRITE, key, value) {
            Ok(()) => Ok(()),
            Err(heed::Error::Mdb(heed::MdbError::KeyExist)) => {
                Err(StoreError::Duplicate(what.to_string()))
            }
            Err(e) => Err(LmdbError::from(e).into()),
        }
    }

    /// Insert a vote row and its receipt index. The stored timestamp is
    /// truncated to whole seconds.
    pub fn insert_vote(&mut self, vote: &VoteRecord) -> Result<(), StoreError> {
        let stored = VoteRecord {
            cast_at: vote.cast_at.truncate_to_secs(),
            ..vote.clone()
        };
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        let receipts_db = self.env.receipts_db;
        let votes_db = self.env.votes_db;
        self.put_unique(
            receipts_db,
            vote.receipt.as_bytes(),
            &vote.election_id.to_be_bytes(),
            "receipt",
        )?;
        self.put_unique(votes_db, &vote_key(vote), &bytes, "vote")
    }

    /// Insert a participation row. A second row for the same
    /// `(voter, election)` fails with [`StoreError::Duplicate`].
    pub fn insert_participation(
        &mut self,
        participation: &ParticipationRecord,
    ) -> Result<(), StoreError> {
        let stored = ParticipationRecord {
            participated_at: participation.participated_at.truncate_to_secs(),
            ..participation.clone()
        };
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        let participations_db = self.env.participations_db;
        self.put_unique(
            participations_db,
            &participation_key(participation),
            &bytes,
            "participation",
        )
    }

    /// Commit unless `cancel` has been raised, in which case the transaction
    /// is aborted and [`StoreError::Aborted`] returned.
    pub fn commit(self, cancel: &CancelFlag) -> Result<(), StoreError> {
        if cancel.is_cancelled() {
            // Dropping the RwTxn aborts it.
            return Err(StoreError::Aborted("caller cancelled before commit".to_string()));
        }
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
