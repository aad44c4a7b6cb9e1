//! LMDB implementation of AuditStore.
//!
//! Keys are big-endian sequence numbers so iteration order is append order.
//! Values are JSON: event metadata is free-form and bincode cannot decode
//! self-describing values.

use evote_store::{AuditEntry, AuditStore, StoreError};
use evote_types::AuditEvent;

use crate::{LmdbEnvironment, LmdbError};

fn decode_seq(key: &[u8]) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = key
        .try_into()
        .map_err(|_| LmdbError::Corruption("audit key length".to_string()))?;
    Ok(u64::from_be_bytes(arr))
}

impl AuditStore for LmdbEnvironment {
    fn append_audit(&self, event: &AuditEvent) -> Result<u64, StoreError> {
        let bytes = serde_json::to_vec(event).map_err(LmdbError::from)?;
        let mut wtxn = self.env().write_txn().map_err(LmdbError::from)?;
        let last = match self.audit_db.last(&wtxn).map_err(LmdbError::from)? {
            Some((key, _)) => decode_seq(key)?,
            None => 0,
        };
        let seq = last + 1;
        self.audit_db
            .put(&mut wtxn, &seq.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(seq)
    }

    fn recent_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let mut entries = Vec::with_capacity(limit.min(1024));
        for result in self
            .audit_db
            .rev_iter(&rtxn)
            .map_err(LmdbError::from)?
            .take(limit)
        {
            let (key, val) = result.map_err(LmdbError::from)?;
            let event: AuditEvent = serde_json::from_slice(val).map_err(LmdbError::from)?;
            entries.push(AuditEntry {
                seq: decode_seq(key)?,
                event,
            });
        }
        Ok(entries)
    }

    fn audit_count(&self) -> Result<u64, StoreError> {
        Ok(self.count(self.audit_db)?)
    }
}
