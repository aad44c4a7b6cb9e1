//! LMDB environment setup.

use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn};

use evote_store::StoreError;

use crate::write_batch::WriteBatch;
use crate::LmdbError;

/// The on-disk layout version this code reads and writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Named databases, in creation order.
pub const DATABASE_NAMES: &[&str] = &[
    "voters",
    "elections",
    "parties",
    "candidates",
    "election_candidates",
    "votes",
    "receipts",
    "participations",
    "audit",
    "meta",
];

const MAX_DBS: u32 = 16;

/// Wraps the LMDB environment and all database handles.
///
/// Cheap to clone: the environment is shared and database handles are `Copy`.
#[derive(Clone)]
pub struct LmdbEnvironment {
    env: Arc<Env>,
    /// `voter_id_be` -> bincode `Voter`
    pub(crate) voters_db: Database<Bytes, Bytes>,
    /// `election_id_be` -> bincode `Election`
    pub(crate) elections_db: Database<Bytes, Bytes>,
    /// `party_id_be` -> bincode `Party`
    pub(crate) parties_db: Database<Bytes, Bytes>,
    /// `candidate_id_be` -> bincode `Candidate`
    pub(crate) candidates_db: Database<Bytes, Bytes>,
    /// `election_id_be ++ candidate_id_be` -> empty
    pub(crate) election_candidates_db: Database<Bytes, Bytes>,
    /// `election_id_be ++ receipt` -> bincode `VoteRecord`
    pub(crate) votes_db: Database<Bytes, Bytes>,
    /// `receipt` -> `election_id_be`
    pub(crate) receipts_db: Database<Bytes, Bytes>,
    /// `voter_id_be ++ election_id_be` -> bincode `ParticipationRecord`
    pub(crate) participations_db: Database<Bytes, Bytes>,
    /// `seq_be` -> JSON `AuditEvent`
    pub(crate) audit_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`, creating every database
    /// and checking the schema version.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process per path; the
        // node never opens the same directory twice concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let voters_db = env.create_database(&mut wtxn, Some("voters"))?;
        let elections_db = env.create_database(&mut wtxn, Some("elections"))?;
        let parties_db = env.create_database(&mut wtxn, Some("parties"))?;
        let candidates_db = env.create_database(&mut wtxn, Some("candidates"))?;
        let election_candidates_db =
            env.create_database(&mut wtxn, Some("election_candidates"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let receipts_db = env.create_database(&mut wtxn, Some("receipts"))?;
        let participations_db = env.create_database(&mut wtxn, Some("participations"))?;
        let audit_db = env.create_database(&mut wtxn, Some("audit"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let lmdb = Self {
            env: Arc::new(env),
            voters_db,
            elections_db,
            parties_db,
            candidates_db,
            election_candidates_db,
            votes_db,
            receipts_db,
            participations_db,
            audit_db,
            meta_db,
        };
        lmdb.ensure_schema()?;

        tracing::info!(path = %path.display(), map_size, "LMDB environment opened");
        Ok(lmdb)
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// Begin a write batch over a single write transaction.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, StoreError> {
        WriteBatch::new(self)
    }

    fn ensure_schema(&self) -> Result<(), LmdbError> {
        match self.read_schema_version()? {
            None => {
                self.write_schema_version(CURRENT_SCHEMA_VERSION)?;
                tracing::info!(version = CURRENT_SCHEMA_VERSION, "initialised fresh database");
                Ok(())
            }
            Some(v) if v == CURRENT_SCHEMA_VERSION => Ok(()),
            Some(v) if v > CURRENT_SCHEMA_VERSION => Err(LmdbError::Corruption(format!(
                "database schema version {} is newer than supported version {}",
                v, CURRENT_SCHEMA_VERSION
            ))),
            Some(v) => Err(LmdbError::Corruption(format!(
                "database schema version {} has no migration to {}",
                v, CURRENT_SCHEMA_VERSION
            ))),
        }
    }

    /// Read a bincode value by key.
    pub(crate) fn get_decoded<T: serde::de::DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        what: &str,
    ) -> Result<T, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let bytes = db
            .get(&rtxn, key)?
            .ok_or_else(|| LmdbError::NotFound(what.to_string()))?;
        Ok(bincode::deserialize(bytes)?)
    }

    /// Write a bincode value in its own transaction, replacing any previous value.
    pub(crate) fn put_encoded<T: serde::Serialize>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
    ) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(value)?;
        let mut wtxn = self.env.write_txn()?;
        db.put(&mut wtxn, key, &bytes)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Decode every value in `db`, in key order.
    pub(crate) fn decode_all<T: serde::de::DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<T>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for result in db.iter(&rtxn)? {
            let (_key, val) = result?;
            out.push(bincode::deserialize(val)?);
        }
        Ok(out)
    }

    pub(crate) fn count(&self, db: Database<Bytes, Bytes>) -> Result<u64, LmdbError> {
        let rtxn = self.env.read_txn()?;
        Ok(db.len(&rtxn)?)
    }
}

/// Count the keys in `db` that start with the 8-byte `prefix`.
pub(crate) fn count_prefix(
    db: Database<Bytes, Bytes>,
    rtxn: &RoTxn<'_>,
    prefix: [u8; 8],
) -> Result<u64, LmdbError> {
    let mut count = 0u64;
    for result in range_prefix(db, rtxn, prefix)? {
        result?;
        count += 1;
    }
    Ok(count)
}

/// Iterate the keys of `db` that start with the 8-byte big-endian `prefix`.
pub(crate) fn range_prefix<'t>(
    db: Database<Bytes, Bytes>,
    rtxn: &'t RoTxn<'_>,
    prefix: [u8; 8],
) -> Result<heed::RoRange<'t, Bytes, Bytes>, LmdbError> {
    let lower = prefix.to_vec();
    let upper = next_prefix(prefix).map(|p| p.to_vec());
    let bounds: (Bound<&[u8]>, Bound<&[u8]>) = (
        Bound::Included(lower.as_slice()),
        match &upper {
            Some(u) => Bound::Excluded(u.as_slice()),
            None => Bound::Unbounded,
        },
    );
    Ok(db.range(rtxn, &bounds)?)
}

/// The smallest 8-byte key greater than every key starting with `prefix`.
fn next_prefix(prefix: [u8; 8]) -> Option<[u8; 8]> {
    u64::from_be_bytes(prefix)
        .checked_add(1)
        .map(u64::to_be_bytes)
}

/// `a_be ++ b_be`
pub(crate) fn composite_key(a: [u8; 8], b: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + b.len());
    key.extend_from_slice(&a);
    key.extend_from_slice(b);
    key
}
