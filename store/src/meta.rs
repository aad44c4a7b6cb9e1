//! Database bookkeeping (schema version and similar).

use crate::StoreError;

pub trait MetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    /// `Ok(None)` when the key was never written.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Schema version of the on-disk layout; `None` for a fresh database.
    fn schema_version(&self) -> Result<Option<u32>, StoreError>;
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
